//! Schema Registry - Startup-time registration of entities and relations

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{LoaderError, LoaderResult};

use super::entity::EntityType;
use super::relation::RelationDescriptor;

/// Process-wide record of entity types and relation descriptors.
///
/// Populated once at startup, then shared immutably with loaders and
/// resolvers. Registration validates shapes and cross-references; the
/// primary-key cardinality rule is deliberately left to loader construction
/// so that an entity used only outside batched relations may declare any key
/// shape it likes.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entities: HashMap<String, Arc<EntityType>>,
    relations: HashMap<String, Arc<RelationDescriptor>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type
    pub fn register_entity(&mut self, entity: EntityType) -> LoaderResult<()> {
        entity.validate()?;
        if self.entities.contains_key(&entity.name) {
            return Err(LoaderError::schema(format!(
                "entity '{}' is already registered",
                entity.name
            )));
        }
        tracing::debug!("Registered entity type '{}' (table '{}')", entity.name, entity.table);
        self.entities.insert(entity.name.clone(), Arc::new(entity));
        Ok(())
    }

    /// Register a relation between two already-registered entities
    pub fn register_relation(&mut self, relation: RelationDescriptor) -> LoaderResult<()> {
        relation.validate()?;
        if self.relations.contains_key(&relation.name) {
            return Err(LoaderError::schema(format!(
                "relation '{}' is already registered",
                relation.name
            )));
        }
        if !self.entities.contains_key(&relation.parent) {
            return Err(LoaderError::UnknownEntity(relation.parent.clone()));
        }
        let child = self
            .entities
            .get(&relation.child)
            .ok_or_else(|| LoaderError::UnknownEntity(relation.child.clone()))?;
        if child.fields.iter().all(|f| f.column != relation.foreign_key) {
            return Err(LoaderError::schema(format!(
                "relation '{}': child entity '{}' has no column '{}'",
                relation.name, relation.child, relation.foreign_key
            )));
        }
        tracing::debug!(
            "Registered relation '{}' ({} -> {})",
            relation.name,
            relation.parent,
            relation.child
        );
        self.relations
            .insert(relation.name.clone(), Arc::new(relation));
        Ok(())
    }

    /// Look up an entity type by name
    pub fn entity(&self, name: &str) -> LoaderResult<Arc<EntityType>> {
        self.entities
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::UnknownEntity(name.to_string()))
    }

    /// Look up a relation by name
    pub fn relation(&self, name: &str) -> LoaderResult<Arc<RelationDescriptor>> {
        self.relations
            .get(name)
            .cloned()
            .ok_or_else(|| LoaderError::UnknownRelation(name.to_string()))
    }

    /// All relations whose parent is the given entity type
    pub fn relations_of(&self, parent: &str) -> Vec<Arc<RelationDescriptor>> {
        let mut relations: Vec<_> = self
            .relations
            .values()
            .filter(|r| r.parent == parent)
            .cloned()
            .collect();
        relations.sort_by(|a, b| a.name.cmp(&b.name));
        relations
    }
}
