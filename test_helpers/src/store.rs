//! In-memory overlay stores.

use std::collections::BTreeMap;

use llm_overlay::spec::{ObjectMeta, Overlay, ServiceSpec};
use llm_overlay::{OverlayStore, StoreError};

/// Overlay store backed by a map keyed on `(namespace, name)`, holding full
/// overlay documents the way a cluster store would.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    overlays: BTreeMap<(String, String), Overlay>,
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an overlay, builder style.
    #[must_use]
    pub fn with(mut self, namespace: &str, name: &str, spec: ServiceSpec) -> Self {
        self.insert(namespace, name, spec);
        self
    }

    /// Add an overlay in place.
    pub fn insert(&mut self, namespace: &str, name: &str, spec: ServiceSpec) {
        let overlay = Overlay {
            metadata: ObjectMeta {
                name: name.to_owned(),
                namespace: namespace.to_owned(),
                ..ObjectMeta::default()
            },
            spec,
        };
        self.overlays
            .insert((namespace.to_owned(), name.to_owned()), overlay);
    }
}

impl OverlayStore for InMemoryStore {
    fn get(&self, namespace: &str, name: &str) -> Result<Option<ServiceSpec>, StoreError> {
        Ok(self
            .overlays
            .get(&(namespace.to_owned(), name.to_owned()))
            .map(|overlay| overlay.spec.clone()))
    }
}

/// Store whose every lookup fails, for exercising error wrapping.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingStore;

impl OverlayStore for FailingStore {
    fn get(&self, _namespace: &str, _name: &str) -> Result<Option<ServiceSpec>, StoreError> {
        Err("store unavailable".into())
    }
}
