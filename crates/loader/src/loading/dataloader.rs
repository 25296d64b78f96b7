//! Relation Loader - Accumulate keys, retrieve once, fan results back out
//!
//! One loader exists per tree location per request. Submissions collect
//! synchronously into the current batch; `fire` composes and executes the
//! combined query exactly once, then delivers each waiter the rows belonging
//! to its key. A key with no matching children resolves to an empty list.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use serde_json::Value as JsonValue;
use tokio::sync::oneshot;

use crate::error::{LoaderError, LoaderResult};
use crate::fields::{FieldArguments, FilterSet};
use crate::query::{QueryComposer, QueryExecutor, SortDirective, PARENT_KEY_COLUMN};
use crate::resolver::ResolutionInfo;
use crate::schema::{EntityType, RelationDescriptor, SchemaRegistry};

type BatchResult = LoaderResult<Vec<JsonValue>>;

#[derive(Default)]
struct BatchState {
    /// Distinct keys in first-submission order
    keys: Vec<JsonValue>,
    /// One waiter per submission, duplicates included
    waiters: Vec<(JsonValue, oneshot::Sender<BatchResult>)>,
}

/// Request-scoped batch loader for one relation at one tree location
pub struct RelationLoader {
    relation: Arc<RelationDescriptor>,
    parent: Arc<EntityType>,
    child: Arc<EntityType>,
    info: ResolutionInfo,
    arguments: FieldArguments,
    sort: Vec<SortDirective>,
    filter_set: Option<Arc<dyn FilterSet>>,
    filter_arg: String,
    composer: QueryComposer,
    executor: Arc<dyn QueryExecutor>,
    pending: Mutex<BatchState>,
}

impl RelationLoader {
    /// Construct a loader, capturing the resolution metadata and arguments
    /// of the first invocation at its tree location.
    ///
    /// Fails with `UnsupportedModel` when either entity's primary-key count
    /// is not exactly one; no query has executed at that point.
    pub fn new(
        schema: Arc<SchemaRegistry>,
        executor: Arc<dyn QueryExecutor>,
        relation: Arc<RelationDescriptor>,
        info: ResolutionInfo,
        arguments: FieldArguments,
        filter_set: Option<Arc<dyn FilterSet>>,
        filter_arg: impl Into<String>,
    ) -> LoaderResult<Self> {
        let parent = schema.entity(&relation.parent)?;
        let child = schema.entity(&relation.child)?;
        parent.primary_key()?;
        child.primary_key()?;
        let sort = arguments.sort_directives()?;

        tracing::debug!(
            "Created relation loader for '{}' at '{}'",
            relation.name,
            info.tree_location()
        );
        Ok(Self {
            relation,
            parent,
            child,
            info,
            arguments,
            sort,
            filter_set,
            filter_arg: filter_arg.into(),
            composer: QueryComposer::new(schema),
            executor,
            pending: Mutex::new(BatchState::default()),
        })
    }

    /// The relation this loader serves
    pub fn relation(&self) -> &RelationDescriptor {
        &self.relation
    }

    /// The acting parent entity type
    pub fn parent_entity(&self) -> &EntityType {
        &self.parent
    }

    /// The child entity type
    pub fn child_entity(&self) -> &EntityType {
        &self.child
    }

    /// Arguments captured from the first invocation at this tree location
    pub fn arguments(&self) -> &FieldArguments {
        &self.arguments
    }

    /// Extract the load key from a parent row via the primary-key field
    pub fn parent_key(&self, parent_row: &JsonValue) -> LoaderResult<JsonValue> {
        let pk = self.parent.primary_key()?;
        match parent_row.get(&pk.column) {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ => Err(LoaderError::MissingKey {
                field: pk.column.clone(),
            }),
        }
    }

    /// Register a key for the current batch and return its deferred handle.
    ///
    /// Duplicate keys within one batch each get an independent handle; all
    /// of them resolve to the same data.
    pub fn submit(&self, key: JsonValue) -> Deferred {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if !pending.keys.contains(&key) {
            pending.keys.push(key.clone());
        }
        pending.waiters.push((key, tx));
        Deferred { rx }
    }

    /// Whether submissions are waiting for the next fire
    pub fn has_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        !pending.waiters.is_empty()
    }

    /// Execute the pending batch: one combined retrieval, then fan-out.
    ///
    /// On failure every waiter of this batch receives the same error; no
    /// partial results are delivered. Submissions arriving after a fire
    /// start a new batch.
    pub async fn fire(&self) -> LoaderResult<()> {
        let batch = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *pending)
        };
        if batch.waiters.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            "Firing batch for relation '{}': {} distinct keys, {} waiters",
            self.relation.name,
            batch.keys.len(),
            batch.waiters.len()
        );

        match self.load_batch(&batch.keys).await {
            Ok(grouped) => {
                for (key, tx) in batch.waiters {
                    let rows = grouped.get(&key).cloned().unwrap_or_default();
                    let _ = tx.send(Ok(rows));
                }
                Ok(())
            }
            Err(err) => {
                for (_, tx) in batch.waiters {
                    let _ = tx.send(Err(err.clone()));
                }
                Err(err)
            }
        }
    }

    /// Compose, execute once, and group rows by the correlation key
    async fn load_batch(
        &self,
        keys: &[JsonValue],
    ) -> LoaderResult<HashMap<JsonValue, Vec<JsonValue>>> {
        let query = self.composer.compose(
            &self.relation,
            keys,
            self.arguments.filters(&self.filter_arg),
            &self.sort,
            self.filter_set.as_deref(),
            &self.info,
        )?;
        let rows = self.executor.fetch_all(&query).await?;

        let mut grouped: HashMap<JsonValue, Vec<JsonValue>> =
            keys.iter().map(|k| (k.clone(), Vec::new())).collect();
        for row in rows {
            let JsonValue::Object(mut columns) = row else {
                return Err(LoaderError::execution(
                    "combined query returned a non-object row",
                ));
            };
            let Some(parent_key) = columns.remove(PARENT_KEY_COLUMN) else {
                return Err(LoaderError::execution(format!(
                    "combined query row is missing the '{}' correlation column",
                    PARENT_KEY_COLUMN
                )));
            };
            grouped
                .entry(parent_key)
                .or_default()
                .push(JsonValue::Object(columns));
        }
        Ok(grouped)
    }
}

/// Deferred handle returned by `RelationLoader::submit`.
///
/// Resolves once the loader's batch fires; rows keep the child-side sort
/// order, and an unmatched key yields an empty list.
pub struct Deferred {
    rx: oneshot::Receiver<BatchResult>,
}

impl Future for Deferred {
    type Output = BatchResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(LoaderError::batch(
                "batch dropped before delivering results",
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryBuilder;
    use crate::schema::EntityType;
    use arbor_core::RequestContext;
    use async_trait::async_trait;
    use serde_json::json;

    struct NullExecutor;

    #[async_trait]
    impl QueryExecutor for NullExecutor {
        async fn fetch_all(&self, _query: &QueryBuilder) -> LoaderResult<Vec<JsonValue>> {
            Ok(Vec::new())
        }
    }

    fn sample_loader() -> RelationLoader {
        let mut schema = SchemaRegistry::new();
        schema
            .register_entity(EntityType::new("User", "users").with_primary_key("id"))
            .unwrap();
        schema
            .register_entity(
                EntityType::new("Post", "posts")
                    .with_primary_key("id")
                    .with_field("user_id"),
            )
            .unwrap();
        schema
            .register_relation(RelationDescriptor::new(
                "user_posts",
                "User",
                "Post",
                "posts",
                "user_id",
            ))
            .unwrap();
        let schema = Arc::new(schema);
        let relation = schema.relation("user_posts").unwrap();
        let info = ResolutionInfo::root("users", Arc::new(RequestContext::new()))
            .descend_field("posts");

        RelationLoader::new(
            schema,
            Arc::new(NullExecutor),
            relation,
            info,
            FieldArguments::empty(),
            None,
            "filters",
        )
        .unwrap()
    }

    #[test]
    fn test_submissions_deduplicate_keys_but_keep_every_waiter() {
        let loader = sample_loader();
        assert!(!loader.has_pending());

        let _a = loader.submit(json!(1));
        let _b = loader.submit(json!(2));
        let _c = loader.submit(json!(1));

        assert!(loader.has_pending());
        let pending = loader.pending.lock().unwrap();
        assert_eq!(pending.keys, vec![json!(1), json!(2)]);
        assert_eq!(pending.waiters.len(), 3);
    }

    #[test]
    fn test_parent_key_extraction() {
        let loader = sample_loader();
        let key = loader.parent_key(&json!({"id": 7, "name": "ada"})).unwrap();
        assert_eq!(key, json!(7));

        let err = loader.parent_key(&json!({"name": "ada"})).unwrap_err();
        assert!(matches!(err, LoaderError::MissingKey { ref field } if field == "id"));

        let err = loader.parent_key(&json!({"id": null})).unwrap_err();
        assert!(matches!(err, LoaderError::MissingKey { .. }));
    }

    #[tokio::test]
    async fn test_fire_with_no_submissions_is_a_no_op() {
        let loader = sample_loader();
        loader.fire().await.unwrap();
        assert!(!loader.has_pending());
    }

    #[tokio::test]
    async fn test_dropped_loader_fails_waiters_instead_of_hanging() {
        let loader = sample_loader();
        let deferred = loader.submit(json!(1));
        drop(loader);
        let err = deferred.await.unwrap_err();
        assert!(matches!(err, LoaderError::Batch { .. }));
    }
}
