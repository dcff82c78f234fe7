//! Version pinning for well-known overlay names.
//!
//! Without pinning, upgrading the controller could silently change which
//! default overlay a running resource resolves against. The pinner records
//! the concrete overlay name for every pinnable logical key, once, in the
//! resource's status annotations; later resolutions reuse the recorded name.
//! Durable persistence of the annotations is the caller's responsibility.

use crate::config::ResolverConfig;
use crate::selection;
use crate::spec::InferenceService;

/// Annotation key prefix under which pins are recorded.
pub const PIN_KEY_PREFIX: &str = "overlays.serving.llm.dev/";

/// Pins well-known overlay names per resource.
#[derive(Clone, Copy, Debug)]
pub struct Pinner<'a> {
    config: &'a ResolverConfig,
}

impl<'a> Pinner<'a> {
    /// Create a pinner driven by the given resolver configuration.
    #[must_use]
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self { config }
    }

    /// Record the currently configured concrete overlay name for every
    /// pinnable logical key that has no non-empty pin yet.
    ///
    /// Idempotent: an existing non-empty entry is never overwritten. A no-op
    /// when versioned overlays are disabled.
    pub fn attach(&self, svc: &mut InferenceService) {
        if !self.config.versioned_overlays {
            return;
        }
        for suffix in selection::PINNABLE_SUFFIXES {
            let key = format!("{PIN_KEY_PREFIX}{suffix}");
            let pinned = svc.status.annotations.get(&key).is_some_and(|v| !v.is_empty());
            if pinned {
                continue;
            }
            let concrete = format!("{}{suffix}", self.config.overlay_prefix);
            svc.status.annotations.insert(key, concrete);
        }
    }

    /// Resolve a concrete overlay name through the resource's pin map.
    ///
    /// Returns the pinned name when one is recorded for the key derived from
    /// `name`, otherwise `name` unchanged. The identity function when
    /// versioned overlays are disabled.
    #[must_use]
    pub fn resolve(&self, svc: &InferenceService, name: &str) -> String {
        if !self.config.versioned_overlays {
            return name.to_owned();
        }
        let suffix = name
            .strip_prefix(&self.config.overlay_prefix)
            .unwrap_or(name);
        let key = format!("{PIN_KEY_PREFIX}{suffix}");
        svc.status
            .annotations
            .get(&key)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| name.to_owned())
    }
}
