//! Field Wiring - Schema-time configuration of nested relation fields

pub mod arguments;
pub mod factory;
pub mod filter;

pub use arguments::{FieldArguments, DEFAULT_FILTER_ARG, SORT_ARG};
pub use factory::{FieldFactory, FieldFactoryBuilder, NestedField};
pub use filter::FilterSet;
