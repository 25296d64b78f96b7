//! Nested Field Resolution - Bridging query-tree nodes to batch loaders

pub mod info;
pub mod nested;
pub mod shaping;

pub use info::{PathSegment, ResolutionInfo};
pub use nested::{FieldFuture, NestedFieldResolver};
pub use shaping::{PassthroughShaper, ResultShaper};
