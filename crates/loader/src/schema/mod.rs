//! Schema Registration - Explicit entity and relation descriptors
//!
//! Everything the loading core knows about entity types and their relations
//! is recorded here once at startup; request-time resolution never inspects
//! live rows or reflects over model types.

pub mod entity;
pub mod registry;
pub mod relation;

pub use entity::{EntityType, FieldDef};
pub use registry::SchemaRegistry;
pub use relation::RelationDescriptor;
