//! Fixture builders for specs, resources and overlay documents.

use llm_overlay::spec::{
    Container, EnvVar, InferenceService, ModelSpec, ObjectMeta, ParallelismSpec, PodSpec,
    ServiceSpec, WorkloadSpec,
};

/// A resource with the given name and namespace and an empty spec.
#[must_use]
pub fn service(name: &str, namespace: &str) -> InferenceService {
    InferenceService {
        metadata: ObjectMeta {
            name: name.to_owned(),
            namespace: namespace.to_owned(),
            ..ObjectMeta::default()
        },
        ..InferenceService::default()
    }
}

/// A resource with a model name already declared.
#[must_use]
pub fn service_with_model(name: &str, namespace: &str, model: &str) -> InferenceService {
    let mut svc = service(name, namespace);
    svc.spec.model = ModelSpec {
        name: Some(model.to_owned()),
        ..ModelSpec::default()
    };
    svc
}

/// A single-container pod template.
#[must_use]
pub fn pod_with_container(container: Container) -> PodSpec {
    PodSpec {
        containers: vec![container],
        ..PodSpec::default()
    }
}

/// A named container with an image.
#[must_use]
pub fn container(name: &str, image: &str) -> Container {
    Container {
        name: name.to_owned(),
        image: image.to_owned(),
        ..Container::default()
    }
}

/// An environment variable with a value.
#[must_use]
pub fn env(name: &str, value: &str) -> EnvVar {
    EnvVar::new(name, value)
}

/// A multi-node workload shape with the given parallelism dimensions.
#[must_use]
pub fn multi_node_workload(parallelism: ParallelismSpec) -> WorkloadSpec {
    WorkloadSpec {
        worker: Some(PodSpec::default()),
        parallelism: Some(parallelism),
        ..WorkloadSpec::default()
    }
}

/// Parse an overlay spec document from YAML.
///
/// # Errors
///
/// Returns an error when the document does not parse into a
/// [`ServiceSpec`].
pub fn spec_from_yaml(document: &str) -> anyhow::Result<ServiceSpec> {
    Ok(serde_yaml::from_str(document)?)
}
