//! Tests for the post-render topology rewiring rules. Each rule must fire
//! only under its documented condition and must be idempotent.

use llm_overlay::rewire::apply_defaults;
use llm_overlay::spec::{
    BackendRef, GatewaySpec, HttpRouteRule, HttpRouteRules, HttpRouteSpec, InferencePoolSpec,
    LocalObjectReference, PodSpec, PoolSpec, RouteSpec, RouterSpec, SchedulerSpec, ServiceSpec,
    UntypedObjectReference,
};
use test_helpers::builders::service;

fn default_backend() -> BackendRef {
    BackendRef {
        group: Some("inference.networking.x-k8s.io".to_owned()),
        kind: Some("InferencePool".to_owned()),
        name: "svc-inference-pool".to_owned(),
        port: Some(8000),
        ..BackendRef::default()
    }
}

fn route_with_backend(backend: BackendRef) -> RouteSpec {
    RouteSpec {
        http: Some(HttpRouteSpec {
            spec: Some(HttpRouteRules {
                rules: vec![HttpRouteRule {
                    backend_refs: vec![backend],
                    ..HttpRouteRule::default()
                }],
                ..HttpRouteRules::default()
            }),
            ..HttpRouteSpec::default()
        }),
    }
}

#[test]
fn an_empty_pool_selector_defaults_to_the_workload_selector() {
    let svc = service("svc", "ns");
    let mut spec = ServiceSpec {
        router: Some(RouterSpec {
            scheduler: Some(SchedulerSpec {
                pool: Some(InferencePoolSpec {
                    spec: Some(PoolSpec::default()),
                    ..InferencePoolSpec::default()
                }),
                ..SchedulerSpec::default()
            }),
            ..RouterSpec::default()
        }),
        ..ServiceSpec::default()
    };

    apply_defaults(&svc, &mut spec);

    let selector = spec
        .router
        .as_ref()
        .unwrap()
        .scheduler
        .as_ref()
        .unwrap()
        .pool
        .as_ref()
        .unwrap()
        .spec
        .as_ref()
        .unwrap()
        .selector
        .clone();
    assert_eq!(selector.get("app.kubernetes.io/name").map(String::as_str), Some("svc"));
    assert_eq!(
        selector.get("app.kubernetes.io/part-of").map(String::as_str),
        Some("llminferenceservice")
    );

    // Idempotent: a second application changes nothing.
    let snapshot = spec.clone();
    apply_defaults(&svc, &mut spec);
    assert_eq!(spec, snapshot);
}

#[test]
fn an_explicit_pool_selector_is_left_alone() {
    let svc = service("svc", "ns");
    let mut pool_spec = PoolSpec::default();
    pool_spec
        .selector
        .insert("team".to_owned(), "search".to_owned());
    let mut spec = ServiceSpec {
        router: Some(RouterSpec {
            scheduler: Some(SchedulerSpec {
                pool: Some(InferencePoolSpec {
                    spec: Some(pool_spec),
                    ..InferencePoolSpec::default()
                }),
                ..SchedulerSpec::default()
            }),
            ..RouterSpec::default()
        }),
        ..ServiceSpec::default()
    };

    apply_defaults(&svc, &mut spec);

    let selector = &spec
        .router
        .as_ref()
        .unwrap()
        .scheduler
        .as_ref()
        .unwrap()
        .pool
        .as_ref()
        .unwrap()
        .spec
        .as_ref()
        .unwrap()
        .selector;
    assert_eq!(selector.len(), 1);
    assert_eq!(selector.get("team").map(String::as_str), Some("search"));
}

#[test]
fn a_scheduler_template_without_a_service_account_gets_a_derived_one() {
    let svc = service("svc", "ns");
    let mut spec = ServiceSpec {
        router: Some(RouterSpec {
            scheduler: Some(SchedulerSpec {
                template: Some(PodSpec::default()),
                ..SchedulerSpec::default()
            }),
            ..RouterSpec::default()
        }),
        ..ServiceSpec::default()
    };

    apply_defaults(&svc, &mut spec);

    let template = spec
        .router
        .unwrap()
        .scheduler
        .unwrap()
        .template
        .unwrap();
    assert_eq!(template.service_account_name, "svc-epp-sa");
}

#[test]
fn an_explicit_service_account_is_preserved() {
    let svc = service("svc", "ns");
    let mut spec = ServiceSpec {
        router: Some(RouterSpec {
            scheduler: Some(SchedulerSpec {
                template: Some(PodSpec {
                    service_account_name: "picker".to_owned(),
                    ..PodSpec::default()
                }),
                ..SchedulerSpec::default()
            }),
            ..RouterSpec::default()
        }),
        ..ServiceSpec::default()
    };

    apply_defaults(&svc, &mut spec);

    let template = spec.router.unwrap().scheduler.unwrap().template.unwrap();
    assert_eq!(template.service_account_name, "picker");
}

#[test]
fn explicit_gateway_refs_rewrite_the_route_parents() {
    let svc = service("svc", "ns");
    let mut spec = ServiceSpec {
        router: Some(RouterSpec {
            route: Some(route_with_backend(default_backend())),
            gateway: Some(GatewaySpec {
                refs: vec![UntypedObjectReference {
                    name: "edge-gw".to_owned(),
                    namespace: "edge".to_owned(),
                }],
            }),
            scheduler: Some(SchedulerSpec::default()),
            ..RouterSpec::default()
        }),
        ..ServiceSpec::default()
    };

    apply_defaults(&svc, &mut spec);

    let rules = spec.router.unwrap().route.unwrap().http.unwrap().spec.unwrap();
    assert_eq!(rules.parent_refs.len(), 1);
    let parent = &rules.parent_refs[0];
    assert_eq!(parent.name, "edge-gw");
    assert_eq!(parent.namespace.as_deref(), Some("edge"));
    assert_eq!(parent.group.as_deref(), Some("gateway.networking.k8s.io"));
    assert_eq!(parent.kind.as_deref(), Some("Gateway"));
}

#[test]
fn the_default_backend_retargets_a_service_when_no_scheduler_exists() {
    let svc = service("svc", "ns");
    let mut spec = ServiceSpec {
        router: Some(RouterSpec {
            route: Some(route_with_backend(default_backend())),
            ..RouterSpec::default()
        }),
        ..ServiceSpec::default()
    };

    apply_defaults(&svc, &mut spec);

    let rules = spec.router.unwrap().route.unwrap().http.unwrap().spec.unwrap();
    let backend = &rules.rules[0].backend_refs[0];
    assert_eq!(backend.group.as_deref(), Some(""));
    assert_eq!(backend.kind.as_deref(), Some("Service"));
    assert_eq!(backend.name, "svc-workload-svc");
    // Untouched fields survive the rewrite.
    assert_eq!(backend.port, Some(8000));
}

#[test]
fn the_default_backend_retargets_an_explicitly_referenced_pool() {
    let svc = service("svc", "ns");
    let mut spec = ServiceSpec {
        router: Some(RouterSpec {
            route: Some(route_with_backend(default_backend())),
            scheduler: Some(SchedulerSpec {
                pool: Some(InferencePoolSpec {
                    pool_ref: Some(LocalObjectReference::named("custom-pool")),
                    ..InferencePoolSpec::default()
                }),
                ..SchedulerSpec::default()
            }),
            ..RouterSpec::default()
        }),
        ..ServiceSpec::default()
    };

    apply_defaults(&svc, &mut spec);

    let rules = spec.router.unwrap().route.unwrap().http.unwrap().spec.unwrap();
    let backend = &rules.rules[0].backend_refs[0];
    assert_eq!(backend.name, "custom-pool");
    assert_eq!(backend.kind.as_deref(), Some("InferencePool"));
}

#[test]
fn a_custom_backend_is_never_rewritten() {
    let svc = service("svc", "ns");
    let custom = BackendRef {
        group: Some(String::new()),
        kind: Some("Service".to_owned()),
        name: "my-own-svc".to_owned(),
        ..BackendRef::default()
    };
    let mut spec = ServiceSpec {
        router: Some(RouterSpec {
            route: Some(route_with_backend(custom.clone())),
            ..RouterSpec::default()
        }),
        ..ServiceSpec::default()
    };

    apply_defaults(&svc, &mut spec);

    let rules = spec.router.unwrap().route.unwrap().http.unwrap().spec.unwrap();
    assert_eq!(rules.rules[0].backend_refs[0], custom);
}
