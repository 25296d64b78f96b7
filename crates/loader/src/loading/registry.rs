//! Loader Registry - One batch loader per tree location per request

use std::fmt;
use std::sync::{Arc, Mutex};

use arbor_core::{Extension, RequestContext};

use crate::error::{LoaderError, LoaderResult};

use super::dataloader::RelationLoader;

/// Identity of "this relation instance in this request": the ordered string
/// path segments from the query root to the field.
///
/// Sibling nodes repeating the same relation at the same path share one
/// loader; distinct paths never do, even for the same relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeLocationKey(Vec<String>);

impl TreeLocationKey {
    /// Create a key from path segments, root first
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// The path segments, root first
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for TreeLocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Request-scoped mapping from tree location to batch loader.
///
/// Lives in the request context's extension slot; created on first use
/// regardless of the context's storage shape. Loaders are kept in creation
/// order so firing is deterministic.
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: Mutex<Vec<(TreeLocationKey, Arc<RelationLoader>)>>,
}

impl LoaderRegistry {
    /// Extension slot name under which the registry is stored
    pub const EXTENSION_KEY: &'static str = "relation_loaders";

    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of the given request, created on first use
    pub fn from_context(context: &RequestContext) -> LoaderResult<Arc<LoaderRegistry>> {
        let slot = context
            .extensions()
            .get_or_init(Self::EXTENSION_KEY, &|| {
                Arc::new(LoaderRegistry::new()) as Extension
            })?;
        slot.downcast::<LoaderRegistry>().map_err(|_| LoaderError::Context {
            message: format!(
                "extension slot '{}' holds a foreign value",
                Self::EXTENSION_KEY
            ),
        })
    }

    /// The loader registered at `key`, if any
    pub fn get(&self, key: &TreeLocationKey) -> Option<Arc<RelationLoader>> {
        let loaders = self.loaders.lock().unwrap_or_else(|e| e.into_inner());
        loaders
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, loader)| Arc::clone(loader))
    }

    /// The loader registered at `key`, constructing and storing it via
    /// `factory` when absent
    pub fn get_or_create<F>(
        &self,
        key: TreeLocationKey,
        factory: F,
    ) -> LoaderResult<Arc<RelationLoader>>
    where
        F: FnOnce() -> LoaderResult<RelationLoader>,
    {
        let mut loaders = self.loaders.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((_, existing)) = loaders.iter().find(|(existing, _)| existing == &key) {
            return Ok(Arc::clone(existing));
        }
        let loader = Arc::new(factory()?);
        loaders.push((key, Arc::clone(&loader)));
        Ok(loader)
    }

    /// Number of registered loaders
    pub fn len(&self) -> usize {
        let loaders = self.loaders.lock().unwrap_or_else(|e| e.into_inner());
        loaders.len()
    }

    /// Whether no loader has been registered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loaders currently holding submissions, in creation order
    pub fn pending_loaders(&self) -> Vec<Arc<RelationLoader>> {
        let loaders = self.loaders.lock().unwrap_or_else(|e| e.into_inner());
        loaders
            .iter()
            .filter(|(_, loader)| loader.has_pending())
            .map(|(_, loader)| Arc::clone(loader))
            .collect()
    }

    /// Fire every loader holding submissions; returns how many fired.
    ///
    /// A failed batch does not keep other loaders' batches from firing; the
    /// first failure is reported after all pending batches ran.
    pub async fn fire_pending(&self) -> LoaderResult<usize> {
        let pending = self.pending_loaders();
        let fired = pending.len();
        let mut first_error = None;
        for loader in pending {
            if let Err(err) = loader.fire().await {
                tracing::warn!(
                    "Batch for relation '{}' failed: {}",
                    loader.relation().name,
                    err
                );
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(fired),
        }
    }
}
