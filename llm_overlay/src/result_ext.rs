//! Extensions for mapping errors to `ResolveResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(e.into()))`
//! patterns when converting error types into the crate's
//! `ResolveResult<T>` alias (`Result<T, Arc<ResolveError>>`).

use std::sync::Arc;

use crate::{ResolveError, ResolveResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<ResolveError>`
/// into a `ResolveResult<T>`.
pub trait ResolveResultExt<T, E> {
    /// Convert `Result<T, E>` into `ResolveResult<T>` using `Into<ResolveError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<ResolveError>`.
    fn into_resolve(self) -> ResolveResult<T>;
}

impl<T, E> ResolveResultExt<T, E> for Result<T, E>
where
    E: Into<ResolveError>,
{
    fn into_resolve(self) -> ResolveResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Extension tailored to mapping `serde_json::Error` into a staged
/// [`ResolveError::Malformed`].
pub trait MalformedExt<T> {
    /// Convert `Result<T, serde_json::Error>` into `ResolveResult<T>`,
    /// recording the resolution stage at which the failure occurred.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError::Malformed`] wrapped in `Arc` when the input
    /// is `Err`.
    fn at_stage(self, stage: &'static str) -> ResolveResult<T>;
}

impl<T> MalformedExt<T> for Result<T, serde_json::Error> {
    fn at_stage(self, stage: &'static str) -> ResolveResult<T> {
        self.map_err(|e| Arc::new(ResolveError::malformed(stage, e)))
    }
}
