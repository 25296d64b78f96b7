//! Query Composer - One combined retrieval per relation batch
//!
//! Turns "for each parent key, its filtered and sorted children" into a
//! single query: the refined child query becomes a derived table joined back
//! to the parent on the relation's correlation columns, with the parent side
//! projected down to its primary key only.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{LoaderError, LoaderResult};
use crate::fields::FilterSet;
use crate::resolver::ResolutionInfo;
use crate::schema::{RelationDescriptor, SchemaRegistry};

use super::builder::QueryBuilder;
use super::types::SortDirective;

/// Reserved column carrying the parent correlation key in combined results.
/// Stripped from child rows before delivery.
pub const PARENT_KEY_COLUMN: &str = "__parent_key";

/// Alias of the derived child table in the combined query
pub const CHILD_ALIAS: &str = "children";

/// Builds the single combined retrieval for a relation and a key set
#[derive(Clone)]
pub struct QueryComposer {
    schema: Arc<SchemaRegistry>,
}

impl QueryComposer {
    /// Create a composer over a registered schema
    pub fn new(schema: Arc<SchemaRegistry>) -> Self {
        Self { schema }
    }

    /// Compose the combined query for `relation` restricted to `parent_keys`.
    ///
    /// Filter and sort stages run only when their arguments are present.
    /// Primary-key cardinality of both entities is validated before any SQL
    /// is produced; filter failures propagate unchanged.
    pub fn compose(
        &self,
        relation: &RelationDescriptor,
        parent_keys: &[Value],
        request_filters: Option<&Value>,
        sort: &[SortDirective],
        filter_set: Option<&dyn FilterSet>,
        info: &ResolutionInfo,
    ) -> LoaderResult<QueryBuilder> {
        if parent_keys.is_empty() {
            return Err(LoaderError::query(
                "cannot compose a combined query for an empty key set",
            ));
        }

        let parent = self.schema.entity(&relation.parent)?;
        let child = self.schema.entity(&relation.child)?;
        let parent_pk = parent.primary_key()?;
        child.primary_key()?;

        let mut child_query = QueryBuilder::new().from(&child.table);

        if let Some(raw_filters) = request_filters {
            let filter_set = filter_set.ok_or_else(|| {
                LoaderError::query(format!(
                    "filter arguments supplied for relation '{}' but entity '{}' has no filter set",
                    relation.name, relation.child
                ))
            })?;
            child_query = filter_set.apply(info, child_query, raw_filters)?;
        }

        for directive in sort {
            child_query = child_query.order_by(directive.clone());
        }

        let parent_key_column = parent.qualified_column(parent_pk);
        let combined = QueryBuilder::new()
            .from(&parent.table)
            .select(&format!("{} AS {}", parent_key_column, PARENT_KEY_COLUMN))
            .select(&format!("{}.*", CHILD_ALIAS))
            .join_subquery(
                child_query,
                CHILD_ALIAS,
                &format!("{}.{}", CHILD_ALIAS, relation.foreign_key),
                &parent_key_column,
            )
            .where_in(&parent_key_column, parent_keys.to_vec());

        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldArguments;
    use crate::resolver::ResolutionInfo;
    use crate::schema::EntityType;
    use arbor_core::RequestContext;
    use serde_json::json;

    fn sample_schema() -> Arc<SchemaRegistry> {
        let mut schema = SchemaRegistry::new();
        schema
            .register_entity(
                EntityType::new("User", "users")
                    .with_primary_key("id")
                    .with_field("name"),
            )
            .unwrap();
        schema
            .register_entity(
                EntityType::new("Post", "posts")
                    .with_primary_key("id")
                    .with_field("user_id")
                    .with_field("title")
                    .with_field("status"),
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
        Arc::new(schema)
    }

    fn info() -> ResolutionInfo {
        ResolutionInfo::root("posts", Arc::new(RequestContext::new()))
    }

    struct StatusFilter;

    impl FilterSet for StatusFilter {
        fn apply(
            &self,
            _info: &ResolutionInfo,
            query: QueryBuilder,
            raw: &Value,
        ) -> LoaderResult<QueryBuilder> {
            let status = raw
                .get("status")
                .and_then(Value::as_str)
                .ok_or_else(|| LoaderError::query("status filter requires a string"))?;
            Ok(query.where_eq("status", status))
        }
    }

    #[test]
    fn test_unfiltered_unsorted_compose_is_a_bare_join() {
        let schema = sample_schema();
        let composer = QueryComposer::new(schema.clone());
        let relation = schema.relation("user_posts").unwrap();

        let query = composer
            .compose(&relation, &[json!(1), json!(2)], None, &[], None, &info())
            .unwrap();
        let (sql, params) = query.to_sql_with_params().unwrap();

        assert_eq!(
            sql,
            "SELECT users.id AS __parent_key, children.* FROM users \
             INNER JOIN (SELECT * FROM posts) AS children \
             ON children.user_id = users.id WHERE users.id IN ($1, $2)"
        );
        assert_eq!(params, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_filter_and_sort_stage_into_the_subquery() {
        let schema = sample_schema();
        let composer = QueryComposer::new(schema.clone());
        let relation = schema.relation("user_posts").unwrap();

        let query = composer
            .compose(
                &relation,
                &[json!(1)],
                Some(&json!({"status": "published"})),
                &[SortDirective::asc("title"), SortDirective::desc("id")],
                Some(&StatusFilter),
                &info(),
            )
            .unwrap();
        let (sql, params) = query.to_sql_with_params().unwrap();

        assert_eq!(
            sql,
            "SELECT users.id AS __parent_key, children.* FROM users \
             INNER JOIN (SELECT * FROM posts WHERE status = $1 \
             ORDER BY title ASC, id DESC) AS children \
             ON children.user_id = users.id WHERE users.id IN ($2)"
        );
        assert_eq!(params, vec![json!("published"), json!(1)]);
    }

    #[test]
    fn test_filters_without_a_filter_set_fail_composition() {
        let schema = sample_schema();
        let composer = QueryComposer::new(schema.clone());
        let relation = schema.relation("user_posts").unwrap();

        let err = composer
            .compose(
                &relation,
                &[json!(1)],
                Some(&json!({"status": "published"})),
                &[],
                None,
                &info(),
            )
            .unwrap_err();
        assert!(matches!(err, LoaderError::Query { .. }));
    }

    #[test]
    fn test_composite_parent_key_fails_before_querying() {
        let mut schema = SchemaRegistry::new();
        schema
            .register_entity(
                EntityType::new("Membership", "memberships")
                    .with_primary_key("user_id")
                    .with_primary_key("group_id"),
            )
            .unwrap();
        schema
            .register_entity(
                EntityType::new("Grant", "grants")
                    .with_primary_key("id")
                    .with_field("membership_id"),
            )
            .unwrap();
        schema
            .register_relation(RelationDescriptor::new(
                "membership_grants",
                "Membership",
                "Grant",
                "grants",
                "membership_id",
            ))
            .unwrap();
        let schema = Arc::new(schema);
        let composer = QueryComposer::new(schema.clone());
        let relation = schema.relation("membership_grants").unwrap();

        let err = composer
            .compose(&relation, &[json!(1)], None, &[], None, &info())
            .unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedModel { found: 2, .. }));
    }

    #[test]
    fn test_empty_key_set_is_rejected() {
        let schema = sample_schema();
        let composer = QueryComposer::new(schema.clone());
        let relation = schema.relation("user_posts").unwrap();

        let err = composer
            .compose(&relation, &[], None, &[], None, &info())
            .unwrap_err();
        assert!(matches!(err, LoaderError::Query { .. }));
    }

    #[test]
    fn test_arguments_sort_order_reaches_the_composer() {
        // directives travel from raw args to the composed ORDER BY untouched
        let args = FieldArguments::from_value(&json!({"sort": ["title", "-id"]})).unwrap();
        let directives = args.sort_directives().unwrap();
        assert_eq!(
            directives,
            vec![SortDirective::asc("title"), SortDirective::desc("id")]
        );
    }
}
