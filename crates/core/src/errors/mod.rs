//! Error types for the arbor foundation layer

mod core;

pub use self::core::{CoreError, CoreResult};
