//! # arbor-core: Foundation for the arbor loading engine
//!
//! Request-scoped context with pluggable extension storage, plus the core
//! error type. The loading crate stores its per-request loader registry in
//! the context's extension slot; everything else about the context is opaque
//! to it.

pub mod context;
pub mod errors;

// Re-export key types for convenience
pub use context::{
    Extension, ExtensionInit, ExtensionSlot, FixedExtensions, MapExtensions, RequestContext,
};
pub use errors::{CoreError, CoreResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
