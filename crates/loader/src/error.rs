//! Error types for the loading engine
//!
//! One taxonomy covers schema registration, query composition, batch
//! execution, and resolution. The type is `Clone` so a single batch failure
//! can be delivered to every waiter of that batch.

use std::sync::Arc;

use thiserror::Error;

/// Result type alias for loading operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Error type for the loading engine
#[derive(Debug, Clone, Error)]
pub enum LoaderError {
    /// An entity participating in a batched relation does not declare
    /// exactly one primary-key field. Raised at loader construction,
    /// before any query executes.
    #[error("Unsupported model '{entity}': the number of primary key fields must be equal to 1 but {found} were found")]
    UnsupportedModel { entity: String, found: usize },

    #[error("Unknown entity type '{0}'")]
    UnknownEntity(String),

    #[error("Unknown relation '{0}'")]
    UnknownRelation(String),

    #[error("Schema error: {message}")]
    Schema { message: String },

    #[error("Query error: {message}")]
    Query { message: String },

    #[error("Execution error: {message}")]
    Execution { message: String },

    #[error("Batch error: {message}")]
    Batch { message: String },

    /// Sibling fields at one tree location supplied differing arguments.
    #[error("Argument mismatch at '{path}': sibling fields at one tree location must carry identical arguments")]
    ArgumentMismatch { path: String },

    #[error("Missing key field '{field}' on parent row")]
    MissingKey { field: String },

    #[error("Context error: {message}")]
    Context { message: String },

    /// Opaque failure from an external collaborator (filter or sort
    /// subsystem), propagated unchanged.
    #[error("{0}")]
    External(Arc<dyn std::error::Error + Send + Sync>),
}

impl LoaderError {
    /// Create a new schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a new query composition error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a new execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    /// Create a new batch lifecycle error
    pub fn batch(message: impl Into<String>) -> Self {
        Self::Batch {
            message: message.into(),
        }
    }

    /// Wrap an external subsystem error without altering it
    pub fn external(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::External(Arc::new(err))
    }
}

impl From<arbor_core::CoreError> for LoaderError {
    fn from(err: arbor_core::CoreError) -> Self {
        Self::Context {
            message: err.to_string(),
        }
    }
}
