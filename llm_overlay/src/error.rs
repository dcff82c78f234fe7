//! Error types produced by overlay resolution.

use thiserror::Error;

/// Errors that can occur while resolving a workload specification.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A referenced overlay is absent from both candidate namespaces.
    #[error(
        "overlay {name:?} not found in namespaces [{resource_namespace:?}, {system_namespace:?}]"
    )]
    OverlayNotFound {
        /// Name of the overlay that could not be found.
        name: String,
        /// Namespace of the resource being resolved, checked first.
        resource_namespace: String,
        /// System namespace checked as a fallback.
        system_namespace: String,
    },

    /// A document failed to (de)serialise during merge or render.
    #[error("malformed spec while trying to {stage}: {source}")]
    Malformed {
        /// Stage of resolution at which the failure occurred.
        stage: &'static str,
        /// Underlying serialisation error.
        #[source]
        source: serde_json::Error,
    },

    /// Placeholder substitution failed.
    #[error("template substitution failed: {0}")]
    Template(#[from] TemplateError),

    /// The overlay store reported an error while fetching an overlay.
    #[error("failed to fetch overlay {name:?}: {source}")]
    Store {
        /// Name of the overlay being fetched.
        name: String,
        /// Error reported by the store.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ResolveError {
    /// Construct a [`ResolveError::Malformed`] for the given stage.
    #[must_use]
    pub fn malformed(stage: &'static str, source: serde_json::Error) -> Self {
        Self::Malformed { stage, source }
    }
}

/// Errors raised while substituting placeholders in a merged document.
///
/// Rendering is strict: a placeholder that cannot be resolved is a hard
/// error, never an empty substitution, and no partially rendered document is
/// ever returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// A string value contains unbalanced or malformed placeholder braces.
    #[error("malformed placeholder in {value:?}: {message}")]
    Syntax {
        /// The offending string value.
        value: String,
        /// Description of the defect.
        message: String,
    },

    /// A placeholder referenced a path absent from the context document.
    #[error("placeholder references undefined field {path:?}")]
    UndefinedReference {
        /// The dotted path that failed to resolve.
        path: String,
    },

    /// A placeholder resolved to an object or list rather than a scalar.
    #[error("placeholder path {path:?} does not resolve to a scalar value")]
    NotScalar {
        /// The dotted path that resolved to a composite value.
        path: String,
    },
}
