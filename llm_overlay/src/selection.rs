//! Topology-driven overlay selection.
//!
//! Computes the ordered list of overlay names to fetch and fold under a
//! resource's own spec. Auto-selected well-known overlays come first, in
//! fixed precedence; the user's explicit base references are appended last
//! so they can override any auto-selected overlay of the same role.

use tracing::warn;

use crate::config::ResolverConfig;
use crate::pin::Pinner;
use crate::spec::{InferenceService, ServiceSpec, WorkloadSpec};

/// Logical suffix of the single-node combined-role overlay.
pub const TEMPLATE_SUFFIX: &str = "llm-template";
/// Logical suffix of the single-node decode overlay.
pub const DECODE_TEMPLATE_SUFFIX: &str = "llm-decode-template";
/// Logical suffix of the single-node prefill overlay.
pub const PREFILL_TEMPLATE_SUFFIX: &str = "llm-prefill-template";
/// Logical suffix of the data-parallel combined-role overlay.
pub const WORKER_DATA_PARALLEL_SUFFIX: &str = "llm-worker-data-parallel";
/// Logical suffix of the data-parallel decode overlay.
pub const DECODE_WORKER_DATA_PARALLEL_SUFFIX: &str = "llm-decode-worker-data-parallel";
/// Logical suffix of the data-parallel prefill overlay.
pub const PREFILL_WORKER_DATA_PARALLEL_SUFFIX: &str = "llm-prefill-worker-data-parallel";
/// Logical suffix of the pipeline-parallel combined-role overlay.
pub const WORKER_PIPELINE_PARALLEL_SUFFIX: &str = "llm-worker-pipeline-parallel";
/// Logical suffix of the pipeline-parallel decode overlay.
pub const DECODE_WORKER_PIPELINE_PARALLEL_SUFFIX: &str = "llm-decode-worker-pipeline-parallel";
/// Logical suffix of the pipeline-parallel prefill overlay.
pub const PREFILL_WORKER_PIPELINE_PARALLEL_SUFFIX: &str = "llm-prefill-worker-pipeline-parallel";
/// Logical suffix of the scheduler overlay.
pub const SCHEDULER_SUFFIX: &str = "llm-scheduler";
/// Logical suffix of the route overlay.
pub const ROUTER_ROUTE_SUFFIX: &str = "llm-router-route";

/// Logical keys recorded by the pinner.
///
/// The pipeline-parallel presets are not shipped yet and resolve unpinned.
// TODO: add the pipeline-parallel suffixes once their presets ship.
pub const PINNABLE_SUFFIXES: [&str; 8] = [
    TEMPLATE_SUFFIX,
    DECODE_TEMPLATE_SUFFIX,
    PREFILL_TEMPLATE_SUFFIX,
    WORKER_DATA_PARALLEL_SUFFIX,
    DECODE_WORKER_DATA_PARALLEL_SUFFIX,
    PREFILL_WORKER_DATA_PARALLEL_SUFFIX,
    SCHEDULER_SUFFIX,
    ROUTER_ROUTE_SUFFIX,
];

/// Workload role an overlay is selected for.
#[derive(Clone, Copy, Debug)]
enum Role {
    /// Single combined workload, no prefill/decode split.
    Combined,
    /// Decode side of a disaggregated deployment.
    Decode,
    /// Prefill side of a disaggregated deployment.
    Prefill,
}

impl Role {
    /// Overlay suffixes for this role: single-node, data-parallel,
    /// pipeline-parallel.
    const fn suffixes(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Combined => (
                TEMPLATE_SUFFIX,
                WORKER_DATA_PARALLEL_SUFFIX,
                WORKER_PIPELINE_PARALLEL_SUFFIX,
            ),
            Self::Decode => (
                DECODE_TEMPLATE_SUFFIX,
                DECODE_WORKER_DATA_PARALLEL_SUFFIX,
                DECODE_WORKER_PIPELINE_PARALLEL_SUFFIX,
            ),
            Self::Prefill => (
                PREFILL_TEMPLATE_SUFFIX,
                PREFILL_WORKER_DATA_PARALLEL_SUFFIX,
                PREFILL_WORKER_PIPELINE_PARALLEL_SUFFIX,
            ),
        }
    }
}

/// Compute the ordered overlay references for `svc`.
///
/// `snapshot` is the best-known spec at selection time: the user's spec with
/// its explicit base references already folded in, so sections enabled by a
/// base overlay still drive selection.
#[must_use]
pub fn reference_list(
    config: &ResolverConfig,
    pinner: &Pinner<'_>,
    svc: &InferenceService,
    snapshot: &ServiceSpec,
) -> Vec<String> {
    let mut refs = Vec::new();
    let concrete = |suffix: &str| format!("{}{suffix}", config.overlay_prefix);

    let router = snapshot.router.as_ref();
    let scheduler = router.and_then(|r| r.scheduler.as_ref());
    if let Some(scheduler) = scheduler {
        let has_pool_ref = scheduler.pool.as_ref().is_some_and(|p| p.has_ref());
        if !has_pool_ref {
            refs.push(pinner.resolve(svc, &concrete(SCHEDULER_SUFFIX)));
        }
    }
    if let Some(route) = router.and_then(|r| r.route.as_ref()) {
        let has_route_refs = route.http.as_ref().is_some_and(|h| h.has_refs());
        if !has_route_refs {
            // The route preset tracks the gateway provider version, so its
            // selection never goes through versioned pinning.
            refs.push(concrete(ROUTER_ROUTE_SUFFIX));
        }
    }

    if let Some(prefill) = snapshot.prefill.as_ref() {
        if let Some(suffix) = role_overlay(Role::Prefill, prefill) {
            refs.push(pinner.resolve(svc, &concrete(suffix)));
        }
        if let Some(suffix) = role_overlay(Role::Decode, &snapshot.workload) {
            refs.push(pinner.resolve(svc, &concrete(suffix)));
        }
    } else if let Some(suffix) = role_overlay(Role::Combined, &snapshot.workload) {
        refs.push(pinner.resolve(svc, &concrete(suffix)));
    }

    // Explicit base refs come last so they override any auto-selected
    // overlay of the same role.
    refs.extend(svc.spec.base_refs.iter().map(|r| r.name.clone()));
    refs
}

/// Three-way topology switch for one workload role.
///
/// Returns `None` for the unresolved case: a worker pod spec with neither
/// parallelism predicate true selects no overlay for the role.
fn role_overlay(role: Role, workload: &WorkloadSpec) -> Option<&'static str> {
    let (single_node, data_parallel, pipeline_parallel) = role.suffixes();
    if workload.worker.is_none() {
        return Some(single_node);
    }
    let parallelism = workload.parallelism.as_ref();
    if parallelism.is_some_and(|p| p.is_data_parallel()) {
        return Some(data_parallel);
    }
    if parallelism.is_some_and(|p| p.is_pipeline_parallel()) {
        return Some(pipeline_parallel);
    }
    warn!(
        role = ?role,
        "multi-node workload is neither data- nor pipeline-parallel; no overlay selected"
    );
    None
}
