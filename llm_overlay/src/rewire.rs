//! Topology-dependent structural defaults.
//!
//! Applied once, after merge and render. Each rule is conditioned on the
//! final merged shape and idempotent, so re-resolving an already resolved
//! spec changes nothing.

use std::collections::BTreeMap;

use crate::names::child_name;
use crate::spec::{BackendRef, InferenceService, ParentReference, ServiceSpec};

/// API group of the gateways routes attach to.
const GATEWAY_GROUP: &str = "gateway.networking.k8s.io";
/// API group of inference pools.
const POOL_GROUP: &str = "inference.networking.x-k8s.io";

/// Suffix of the scheduler's service account name.
const SCHEDULER_SA_SUFFIX: &str = "-epp-sa";
/// Suffix of the implicit inference-pool name.
const POOL_SUFFIX: &str = "-inference-pool";
/// Suffix of the fallback workload Service name.
const WORKLOAD_SVC_SUFFIX: &str = "-workload-svc";

/// Apply every rewiring rule to `spec`.
pub fn apply_defaults(svc: &InferenceService, spec: &mut ServiceSpec) {
    default_pool_selector(svc, spec);
    default_scheduler_service_account(svc, spec);
    rewire_route_parents(spec);
    rewire_default_backend(svc, spec);
}

/// Canonical selector matching the resource's own workload pods.
fn workload_selector(svc: &InferenceService) -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "app.kubernetes.io/part-of".to_owned(),
            "llminferenceservice".to_owned(),
        ),
        (
            "app.kubernetes.io/name".to_owned(),
            svc.metadata.name.clone(),
        ),
        ("llm.dev/component".to_owned(), "workload".to_owned()),
    ])
}

/// A configured pool spec without an explicit selector targets the
/// resource's own workload pods.
fn default_pool_selector(svc: &InferenceService, spec: &mut ServiceSpec) {
    let Some(pool_spec) = spec
        .router
        .as_mut()
        .and_then(|r| r.scheduler.as_mut())
        .and_then(|s| s.pool.as_mut())
        .and_then(|p| p.spec.as_mut())
    else {
        return;
    };
    if pool_spec.selector.is_empty() {
        pool_spec.selector = workload_selector(svc);
    }
}

/// A scheduler pod template without a service account gets a derived one.
fn default_scheduler_service_account(svc: &InferenceService, spec: &mut ServiceSpec) {
    let Some(template) = spec
        .router
        .as_mut()
        .and_then(|r| r.scheduler.as_mut())
        .and_then(|s| s.template.as_mut())
    else {
        return;
    };
    if template.service_account_name.is_empty() {
        template.service_account_name = child_name(&svc.metadata.name, SCHEDULER_SA_SUFFIX);
    }
}

/// Explicit gateway references replace the managed route's parents, so the
/// route attaches to the user's gateways rather than the preset default.
fn rewire_route_parents(spec: &mut ServiceSpec) {
    let Some(router) = spec.router.as_mut() else {
        return;
    };
    let gateway_refs = match router.gateway.as_ref() {
        Some(gateway) if gateway.has_refs() => gateway.refs.clone(),
        _ => return,
    };
    let Some(rules) = router
        .route
        .as_mut()
        .and_then(|r| r.http.as_mut())
        .and_then(|h| h.spec.as_mut())
    else {
        return;
    };
    rules.parent_refs = gateway_refs
        .iter()
        .map(|gateway| ParentReference {
            group: Some(GATEWAY_GROUP.to_owned()),
            kind: Some("Gateway".to_owned()),
            name: gateway.name.clone(),
            namespace: (!gateway.namespace.is_empty()).then(|| gateway.namespace.clone()),
        })
        .collect();
}

/// Retarget the system-generated default backend reference.
///
/// With no scheduler configured the implicit pool will never exist, so the
/// route must point at a plain workload Service instead; with a scheduler
/// carrying an explicit pool reference, the route points at that pool.
fn rewire_default_backend(svc: &InferenceService, spec: &mut ServiceSpec) {
    let default_pool_name = child_name(&svc.metadata.name, POOL_SUFFIX);
    let Some(router) = spec.router.as_mut() else {
        return;
    };
    let scheduler_present = router.scheduler.is_some();
    let pool_ref_name = router
        .scheduler
        .as_ref()
        .and_then(|s| s.pool.as_ref())
        .filter(|p| p.has_ref())
        .and_then(|p| p.pool_ref.as_ref())
        .map(|r| r.name.clone());
    let Some(rules) = router
        .route
        .as_mut()
        .and_then(|r| r.http.as_mut())
        .and_then(|h| h.spec.as_mut())
    else {
        return;
    };
    for rule in &mut rules.rules {
        for backend in &mut rule.backend_refs {
            if !is_default_backend(backend, &default_pool_name) {
                continue;
            }
            if scheduler_present {
                if let Some(name) = &pool_ref_name {
                    backend.name.clone_from(name);
                }
            } else {
                backend.group = Some(String::new());
                backend.kind = Some("Service".to_owned());
                backend.name = child_name(&svc.metadata.name, WORKLOAD_SVC_SUFFIX);
            }
        }
    }
}

fn is_default_backend(backend: &BackendRef, default_pool_name: &str) -> bool {
    backend.group.as_deref() == Some(POOL_GROUP)
        && backend.kind.as_deref() == Some("InferencePool")
        && backend.name == default_pool_name
}
