//! Relation Descriptors

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, LoaderResult};

/// A named, directed parent-to-child association.
///
/// Recorded once at schema registration and immutable afterwards; resolution
/// reads the descriptor instead of introspecting live objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// Relation name, unique within the schema
    pub name: String,

    /// Parent entity type name
    pub parent: String,

    /// Child entity type name
    pub child: String,

    /// Attribute on the parent type that exposes the loaded children
    pub attribute: String,

    /// Column on the child table referencing the parent's primary key
    pub foreign_key: String,
}

impl RelationDescriptor {
    /// Create a relation descriptor
    pub fn new(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
        attribute: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            child: child.into(),
            attribute: attribute.into(),
            foreign_key: foreign_key.into(),
        }
    }

    /// Validate the descriptor's shape (entity existence is checked by the
    /// registry at registration)
    pub fn validate(&self) -> LoaderResult<()> {
        for (label, value) in [
            ("name", &self.name),
            ("parent", &self.parent),
            ("child", &self.child),
            ("attribute", &self.attribute),
            ("foreign_key", &self.foreign_key),
        ] {
            if value.is_empty() {
                return Err(LoaderError::schema(format!(
                    "relation descriptor requires a non-empty {}",
                    label
                )));
            }
        }
        Ok(())
    }
}
