//! Field Factory - Schema-build-time wiring of nested relation fields
//!
//! Decides once per relation whether the field is filterable (the child
//! entity has a dedicated filter set) or a default field. Configuration is
//! immutable after `build()`; nothing here holds request-time state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::LoaderResult;
use crate::schema::{RelationDescriptor, SchemaRegistry};

use super::arguments::DEFAULT_FILTER_ARG;
use super::filter::FilterSet;

/// A wired nested field: the relation plus its filter configuration
#[derive(Clone)]
pub struct NestedField {
    pub relation: Arc<RelationDescriptor>,
    /// Filter set of the child entity; `None` makes this a default
    /// (unfiltered) field
    pub filter_set: Option<Arc<dyn FilterSet>>,
    /// Argument name the loader reads raw filter input from
    pub filter_arg: String,
}

impl NestedField {
    /// Whether the field accepts filter input
    pub fn is_filterable(&self) -> bool {
        self.filter_set.is_some()
    }
}

impl fmt::Debug for NestedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedField")
            .field("relation", &self.relation.name)
            .field("filterable", &self.is_filterable())
            .field("filter_arg", &self.filter_arg)
            .finish()
    }
}

/// Immutable schema-time field configuration
pub struct FieldFactory {
    schema: Arc<SchemaRegistry>,
    filter_sets: HashMap<String, Arc<dyn FilterSet>>,
    filter_arg: String,
}

impl FieldFactory {
    /// Start building a factory over a registered schema
    pub fn builder(schema: Arc<SchemaRegistry>) -> FieldFactoryBuilder {
        FieldFactoryBuilder {
            schema,
            filter_sets: HashMap::new(),
            filter_arg: DEFAULT_FILTER_ARG.to_string(),
        }
    }

    /// Wire the field for one relation
    pub fn field(&self, relation_name: &str) -> LoaderResult<NestedField> {
        let relation = self.schema.relation(relation_name)?;
        let filter_set = self.filter_sets.get(&relation.child).cloned();
        Ok(NestedField {
            relation,
            filter_set,
            filter_arg: self.filter_arg.clone(),
        })
    }

    /// Wire the fields for every relation of a parent entity type
    pub fn fields_for(&self, parent: &str) -> Vec<NestedField> {
        self.schema
            .relations_of(parent)
            .into_iter()
            .map(|relation| {
                let filter_set = self.filter_sets.get(&relation.child).cloned();
                NestedField {
                    relation,
                    filter_set,
                    filter_arg: self.filter_arg.clone(),
                }
            })
            .collect()
    }

    /// The configured filter argument name
    pub fn filter_arg(&self) -> &str {
        &self.filter_arg
    }
}

/// Builder for `FieldFactory`
pub struct FieldFactoryBuilder {
    schema: Arc<SchemaRegistry>,
    filter_sets: HashMap<String, Arc<dyn FilterSet>>,
    filter_arg: String,
}

impl FieldFactoryBuilder {
    /// Associate a filter set with a child entity type
    pub fn filter_set(mut self, entity: impl Into<String>, filter_set: Arc<dyn FilterSet>) -> Self {
        self.filter_sets.insert(entity.into(), filter_set);
        self
    }

    /// Override the filter argument name (default `"filters"`)
    pub fn filter_arg(mut self, name: impl Into<String>) -> Self {
        self.filter_arg = name.into();
        self
    }

    /// Freeze the configuration
    pub fn build(self) -> FieldFactory {
        FieldFactory {
            schema: self.schema,
            filter_sets: self.filter_sets,
            filter_arg: self.filter_arg,
        }
    }
}
