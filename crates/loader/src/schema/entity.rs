//! Entity Type Descriptors

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, LoaderResult};

/// One field of an entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as exposed to the resolution engine
    pub name: String,

    /// Backing column name
    pub column: String,

    /// Whether this field is the entity's primary key
    pub primary_key: bool,
}

impl FieldDef {
    /// Create a plain field whose column matches its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            primary_key: false,
        }
    }

    /// Create a primary-key field whose column matches its name
    pub fn primary_key(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            primary_key: true,
        }
    }

    /// Override the backing column name
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}

/// A named record type participating in batched relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityType {
    /// Type name as exposed to the resolution engine
    pub name: String,

    /// Backing table name
    pub table: String,

    /// Declared fields, in declaration order
    pub fields: Vec<FieldDef>,
}

impl EntityType {
    /// Create an entity type with no fields yet
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            fields: Vec::new(),
        }
    }

    /// Append a plain field
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef::new(name));
        self
    }

    /// Append a primary-key field
    pub fn with_primary_key(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef::primary_key(name));
        self
    }

    /// Append a fully specified field
    pub fn with_field_def(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The entity's unique primary-key field.
    ///
    /// Batched relations require exactly one; zero or several is an
    /// `UnsupportedModel` error.
    pub fn primary_key(&self) -> LoaderResult<&FieldDef> {
        let pk_fields: Vec<&FieldDef> = self.fields.iter().filter(|f| f.primary_key).collect();
        match pk_fields.as_slice() {
            [field] => Ok(*field),
            _ => Err(LoaderError::UnsupportedModel {
                entity: self.name.clone(),
                found: pk_fields.len(),
            }),
        }
    }

    /// Column reference qualified with the entity's table
    pub fn qualified_column(&self, field: &FieldDef) -> String {
        format!("{}.{}", self.table, field.column)
    }

    /// Validate the declaration: non-empty names and no duplicate fields
    pub fn validate(&self) -> LoaderResult<()> {
        if self.name.is_empty() || self.table.is_empty() {
            return Err(LoaderError::schema(
                "entity type requires a name and a table",
            ));
        }
        for (i, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() || field.column.is_empty() {
                return Err(LoaderError::schema(format!(
                    "entity '{}' declares a field with an empty name or column",
                    self.name
                )));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(LoaderError::schema(format!(
                    "entity '{}' declares field '{}' more than once",
                    self.name, field.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_lookup() {
        let entity = EntityType::new("User", "users")
            .with_primary_key("id")
            .with_field("name");

        let pk = entity.primary_key().unwrap();
        assert_eq!(pk.name, "id");
        assert_eq!(entity.qualified_column(pk), "users.id");
    }

    #[test]
    fn test_zero_primary_keys_is_unsupported() {
        let entity = EntityType::new("Note", "notes").with_field("body");
        let err = entity.primary_key().unwrap_err();
        assert!(matches!(
            err,
            LoaderError::UnsupportedModel { found: 0, .. }
        ));
    }

    #[test]
    fn test_two_primary_keys_is_unsupported() {
        let entity = EntityType::new("Membership", "memberships")
            .with_primary_key("user_id")
            .with_primary_key("group_id");
        let err = entity.primary_key().unwrap_err();
        assert!(matches!(
            err,
            LoaderError::UnsupportedModel { found: 2, .. }
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_fields() {
        let entity = EntityType::new("User", "users")
            .with_primary_key("id")
            .with_field("name")
            .with_field("name");
        assert!(entity.validate().is_err());
    }

    #[test]
    fn test_field_column_override() {
        let entity = EntityType::new("User", "users")
            .with_primary_key("id")
            .with_field_def(FieldDef::new("displayName").with_column("display_name"));

        let field = entity.field("displayName").unwrap();
        assert_eq!(entity.qualified_column(field), "users.display_name");
    }
}
