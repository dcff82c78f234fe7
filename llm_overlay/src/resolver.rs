//! Resolution orchestration.
//!
//! Folds overlays under the user's spec in the fixed order, renders
//! placeholders and applies topology defaults. Resolution is a pure,
//! synchronous computation over the resource snapshot and the fetched
//! overlay documents; the only mutations on the resource are the model-name
//! default and the pin annotations, both left for the caller to persist.

use std::sync::Arc;

use tracing::debug;

use crate::ResolveResult;
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::merge::merge_specs;
use crate::pin::Pinner;
use crate::rewire;
use crate::selection;
use crate::spec::{InferenceService, ServiceSpec};
use crate::store::OverlayStore;
use crate::template::{self, TemplateContext};

/// Resolves fully materialised workload specifications.
#[derive(Clone, Debug)]
pub struct OverlayResolver<S> {
    store: S,
    config: ResolverConfig,
}

impl<S: OverlayStore> OverlayResolver<S> {
    /// Create a resolver over the given store and configuration.
    #[must_use]
    pub fn new(store: S, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    /// The configuration this resolver runs with.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the final spec for `svc`.
    ///
    /// On success the returned spec is owned exclusively by the caller; the
    /// resolver keeps no reference to it. `svc` is mutated only to default
    /// the model name and to attach pin annotations.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] on a missing overlay, a store failure, a
    /// malformed document or a template defect. No partial result is ever
    /// returned.
    pub fn resolve(&self, svc: &mut InferenceService) -> ResolveResult<ServiceSpec> {
        if svc.spec.model.name.as_deref().is_none_or(str::is_empty) {
            svc.spec.model.name = Some(svc.metadata.name.clone());
        }

        let pinner = Pinner::new(&self.config);
        pinner.attach(svc);

        // Fold explicit base refs into a snapshot first: a base overlay may
        // enable sections (router, prefill) that drive overlay selection.
        let mut snapshot = svc.spec.clone();
        for base_ref in &svc.spec.base_refs {
            let overlay = self.fetch(svc, &base_ref.name)?;
            snapshot = merge_specs([snapshot, overlay])?;
        }
        if let Some(name) = snapshot.model.name.as_ref().filter(|n| !n.is_empty()) {
            // A base ref may have substituted the defaulted model name.
            svc.spec.model.name = Some(name.clone());
        }

        let refs = selection::reference_list(&self.config, &pinner, svc, &snapshot);
        debug!(refs = ?refs, "resolved overlay references");

        let mut specs = Vec::with_capacity(refs.len() + 1);
        for name in &refs {
            specs.push(self.fetch(svc, name)?);
        }
        specs.push(svc.spec.clone());
        let merged = merge_specs(specs)?;

        let ctx = TemplateContext::new(svc, &self.config)?;
        let mut resolved = template::substitute_spec(&merged, &ctx)?;
        rewire::apply_defaults(svc, &mut resolved);
        Ok(resolved)
    }

    /// Fetch one overlay, preferring the resource namespace over the system
    /// namespace. Absence from both is fatal.
    fn fetch(&self, svc: &InferenceService, name: &str) -> ResolveResult<ServiceSpec> {
        let resource_namespace = svc.metadata.namespace.as_str();
        let system_namespace = self.config.system_namespace.as_str();
        for namespace in [resource_namespace, system_namespace] {
            match self.store.get(namespace, name) {
                Ok(Some(spec)) => return Ok(spec),
                Ok(None) => {}
                Err(source) => {
                    return Err(Arc::new(ResolveError::Store {
                        name: name.to_owned(),
                        source,
                    }));
                }
            }
        }
        Err(Arc::new(ResolveError::OverlayNotFound {
            name: name.to_owned(),
            resource_namespace: resource_namespace.to_owned(),
            system_namespace: system_namespace.to_owned(),
        }))
    }
}
