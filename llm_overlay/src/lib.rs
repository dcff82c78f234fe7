//! Overlay merge and resolution engine for LLM inference workload
//! specifications.
//!
//! The engine layers named configuration fragments ("overlays") under a
//! user's declared spec, substitutes dynamic placeholder values and applies
//! a small set of topology-dependent structural defaults, producing the
//! fully materialised spec a reconciliation loop turns into deployable
//! objects. It never talks to a remote store itself: overlays arrive through
//! the [`OverlayStore`] contract, and resolution is a pure, synchronous
//! computation over immutable inputs.
//!
//! Entry point: [`OverlayResolver::resolve`]. The individual stages —
//! structural merge ([`merge_specs`]), overlay selection, version pinning,
//! template substitution and topology rewiring — are exposed as modules for
//! direct use and testing.

mod config;
mod error;
pub mod merge;
mod names;
pub mod pin;
mod resolver;
mod result_ext;
pub mod rewire;
pub mod selection;
pub mod spec;
mod store;
pub mod template;

use std::sync::Arc;

pub use config::ResolverConfig;
pub use error::{ResolveError, TemplateError};
pub use merge::merge_specs;
pub use names::child_name;
pub use resolver::OverlayResolver;
pub use result_ext::{MalformedExt, ResolveResultExt};
pub use store::{OverlayStore, StoreError};

/// Result alias used across the crate; errors are shared so stages can
/// propagate them without cloning the underlying causes.
pub type ResolveResult<T> = Result<T, Arc<ResolveError>>;
