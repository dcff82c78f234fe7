//! The overlay lookup contract.

use crate::spec::ServiceSpec;

/// Error type stores may surface; opaque to the resolver, which wraps it
/// together with the overlay name being fetched.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Named lookup of overlay documents.
///
/// The resolver calls this once per reference, first with the resource's
/// own namespace and then with the configured system namespace. `Ok(None)`
/// means "not found in this namespace"; only the resolver decides whether
/// that is fatal.
pub trait OverlayStore {
    /// Fetch the overlay named `name` from `namespace`.
    ///
    /// # Errors
    ///
    /// Implementations return [`StoreError`] for infrastructure failures;
    /// plain absence is `Ok(None)`.
    fn get(&self, namespace: &str, name: &str) -> Result<Option<ServiceSpec>, StoreError>;
}

impl<S: OverlayStore + ?Sized> OverlayStore for &S {
    fn get(&self, namespace: &str, name: &str) -> Result<Option<ServiceSpec>, StoreError> {
        (**self).get(namespace, name)
    }
}
