//! Typed document schema for inference-service workload specifications.
//!
//! Every field skips serialisation at its zero value, so serialising a
//! default-constructed document yields `{}`. The merge engine relies on this:
//! the serialised form of an overlay *is* its effective patch, and an unset
//! field can never clobber previously merged state.

mod pod;
mod resource;
mod router;
pub mod strategy;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use pod::{
    Container, ContainerPort, EmptyDirVolumeSource, EnvVar, PodSpec, ResourceRequirements,
    Toleration, Volume, VolumeMount,
};
pub use resource::{InferenceService, ObjectMeta, Overlay, ServiceStatus};
pub use router::{
    BackendRef, ExtensionRef, GatewaySpec, HttpPathMatch, HttpRouteMatch, HttpRouteRule,
    HttpRouteRules, HttpRouteSpec, InferencePoolSpec, ParentReference, PoolSpec, RouteSpec,
    RouterSpec, SchedulerSpec, UntypedObjectReference,
};

pub(crate) fn is_false(flag: &bool) -> bool {
    !*flag
}

/// Workload specification for an inference service.
///
/// This is both the user-declared document and the shape of every overlay;
/// overlays are partial instances of the same schema.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Reference to the model being served.
    #[serde(default, skip_serializing_if = "ModelSpec::is_empty")]
    pub model: ModelSpec,

    /// Primary (decode, or combined) workload shape.
    #[serde(flatten)]
    pub workload: WorkloadSpec,

    /// Optional prefill workload for disaggregated prefill/decode serving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefill: Option<WorkloadSpec>,

    /// Routing stack: route, gateway and scheduler/pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<RouterSpec>,

    /// Named overlays the user layers under this spec, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_refs: Vec<LocalObjectReference>,
}

/// Shape of one serving workload role.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    /// Desired replica count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Parallelism dimensions driving topology classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<ParallelismSpec>,

    /// Pod template for the primary (or leader) pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PodSpec>,

    /// Pod template for worker pods; present only for multi-node workloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<PodSpec>,
}

/// Model reference and storage detail.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpec {
    /// Source URI of the model artefacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Served model name; defaults to the resource name when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Scheduling criticality advertised to the pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criticality: Option<String>,

    /// Where and how model artefacts are mounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageSpec>,
}

impl ModelSpec {
    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Storage location for model artefacts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    /// Mount path inside serving containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Opaque storage parameters handed to the initialiser.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

/// Parallelism dimensions of a workload role.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelismSpec {
    /// Tensor-parallel size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tensor: Option<i32>,

    /// Pipeline-parallel size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<i32>,

    /// Data-parallel size across the whole role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<i32>,

    /// Data-parallel size local to one node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_local: Option<i32>,

    /// RPC port used for data-parallel coordination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_rpc_port: Option<i32>,

    /// Whether expert parallelism is enabled.
    #[serde(default, skip_serializing_if = "is_false")]
    pub expert: bool,
}

impl ParallelismSpec {
    /// A role is data-parallel when either data-parallel dimension is set.
    ///
    /// Mutually exclusive with [`Self::is_pipeline_parallel`] by convention;
    /// the convention is not enforced here.
    #[must_use]
    pub fn is_data_parallel(&self) -> bool {
        self.data.is_some() || self.data_local.is_some()
    }

    /// A role is pipeline-parallel when the pipeline size exceeds one.
    #[must_use]
    pub fn is_pipeline_parallel(&self) -> bool {
        self.pipeline.is_some_and(|p| p > 1)
    }
}

/// Reference to an object in the same namespace, by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    /// Name of the referenced object.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl LocalObjectReference {
    /// Convenience constructor.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
