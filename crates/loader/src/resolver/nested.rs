//! Nested Field Resolver - One invocation per query-tree node
//!
//! Looks up or creates the shared batch loader for the node's tree location,
//! submits the parent's key, and returns a deferred value. All sibling
//! invocations of one field position land in the same batch.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::{LoaderError, LoaderResult};
use crate::fields::{FieldArguments, NestedField};
use crate::loading::{LoaderRegistry, RelationLoader};
use crate::query::QueryExecutor;
use crate::schema::SchemaRegistry;

use super::info::ResolutionInfo;
use super::shaping::{PassthroughShaper, ResultShaper};

/// The deferred resolved value of a nested field
pub type FieldFuture = Pin<Box<dyn Future<Output = LoaderResult<JsonValue>> + Send>>;

/// Entry point invoked once per nested-relation node
pub struct NestedFieldResolver {
    schema: Arc<SchemaRegistry>,
    executor: Arc<dyn QueryExecutor>,
    shaper: Arc<dyn ResultShaper>,
}

impl NestedFieldResolver {
    /// Create a resolver with passthrough result shaping
    pub fn new(schema: Arc<SchemaRegistry>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            schema,
            executor,
            shaper: Arc::new(PassthroughShaper),
        }
    }

    /// Replace the result-shaping step
    pub fn with_shaper(mut self, shaper: Arc<dyn ResultShaper>) -> Self {
        self.shaper = shaper;
        self
    }

    /// Resolve one node: enqueue the parent's key with the location's shared
    /// loader and return the deferred, shaped value.
    ///
    /// The first invocation at a tree location constructs the loader and
    /// captures its arguments; a later sibling carrying different arguments
    /// fails with `ArgumentMismatch` rather than being silently coerced to
    /// the captured ones.
    pub fn resolve(
        &self,
        field: &NestedField,
        info: &ResolutionInfo,
        parent_row: &JsonValue,
        arguments: FieldArguments,
    ) -> LoaderResult<FieldFuture> {
        let location = info.tree_location();
        let registry = LoaderRegistry::from_context(info.context())?;

        let loader = match registry.get(&location) {
            Some(existing) => {
                if existing.arguments() != &arguments {
                    return Err(LoaderError::ArgumentMismatch {
                        path: location.to_string(),
                    });
                }
                existing
            }
            None => registry.get_or_create(location, || {
                RelationLoader::new(
                    Arc::clone(&self.schema),
                    Arc::clone(&self.executor),
                    Arc::clone(&field.relation),
                    info.clone(),
                    arguments.clone(),
                    field.filter_set.clone(),
                    field.filter_arg.clone(),
                )
            })?,
        };

        let key = loader.parent_key(parent_row)?;
        let deferred = loader.submit(key);

        let shaper = Arc::clone(&self.shaper);
        let info = info.clone();
        Ok(Box::pin(async move {
            let rows = deferred.await?;
            shaper.shape(&info, rows)
        }))
    }
}
