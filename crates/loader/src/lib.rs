//! # arbor-loader: Batched nested-relation loading
//!
//! When a query node asks for a filtered, sorted collection of child records
//! belonging to many parent records at once, this crate fetches all children
//! for all parents with a single combined retrieval instead of one per
//! parent.
//!
//! The moving parts: a [`schema::SchemaRegistry`] records entities and
//! relations once at startup; a [`fields::FieldFactory`] wires nested fields
//! (filterable or default) at schema-build time; at request time the
//! [`resolver::NestedFieldResolver`] funnels every sibling invocation of a
//! field position into one [`loading::RelationLoader`], whose batch the
//! [`loading::WaveScheduler`] fires at the wave boundary through the
//! [`query::QueryComposer`] and a [`query::QueryExecutor`].

pub mod error;
pub mod fields;
pub mod loading;
pub mod query;
pub mod resolver;
pub mod schema;

// Re-export core traits and types
pub use error::{LoaderError, LoaderResult};
pub use fields::{FieldArguments, FieldFactory, FilterSet, NestedField, DEFAULT_FILTER_ARG};
pub use loading::{Deferred, LoaderRegistry, RelationLoader, TreeLocationKey, WaveScheduler};
pub use query::{
    PoolConfig, PostgresExecutor, QueryBuilder, QueryComposer, QueryExecutor, SortDirective,
};
pub use resolver::{NestedFieldResolver, PassthroughShaper, ResolutionInfo, ResultShaper};
pub use schema::{EntityType, FieldDef, RelationDescriptor, SchemaRegistry};

// Re-export the context foundation
pub use arbor_core::{ExtensionSlot, RequestContext};
