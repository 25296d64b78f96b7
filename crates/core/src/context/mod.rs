//! Request Context - Request-scoped state and extension storage

pub mod extensions;
pub mod request;

pub use extensions::{Extension, ExtensionInit, ExtensionSlot, FixedExtensions, MapExtensions};
pub use request::RequestContext;
