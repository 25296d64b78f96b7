//! Query Builder - SELECT-only builder for composed relation queries

use serde_json::Value;

use super::types::*;

/// Fluent builder for the read-only queries the loading core composes.
///
/// Filter sets refine a builder through the `where_*` methods; the composer
/// wraps the refined builder as a derived table and joins it back to the
/// parent side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    pub(crate) select_fields: Vec<String>,
    pub(crate) from_table: Option<String>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) order_by: Vec<SortDirective>,
}

impl QueryBuilder {
    /// Create a new query builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the FROM table
    pub fn from(mut self, table: &str) -> Self {
        self.from_table = Some(table.to_string());
        self
    }

    /// Add a projection entry; an empty projection renders as `*`
    pub fn select(mut self, expr: &str) -> Self {
        self.select_fields.push(expr.to_string());
        self
    }

    fn push_condition(mut self, column: &str, operator: QueryOperator, value: Option<Value>) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator,
            value,
            values: Vec::new(),
        });
        self
    }

    /// Add a WHERE equality condition
    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, QueryOperator::Equal, Some(value.into()))
    }

    /// Add a WHERE inequality condition
    pub fn where_ne(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, QueryOperator::NotEqual, Some(value.into()))
    }

    /// Add a WHERE greater-than condition
    pub fn where_gt(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, QueryOperator::GreaterThan, Some(value.into()))
    }

    /// Add a WHERE greater-than-or-equal condition
    pub fn where_gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, QueryOperator::GreaterThanOrEqual, Some(value.into()))
    }

    /// Add a WHERE less-than condition
    pub fn where_lt(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, QueryOperator::LessThan, Some(value.into()))
    }

    /// Add a WHERE less-than-or-equal condition
    pub fn where_lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, QueryOperator::LessThanOrEqual, Some(value.into()))
    }

    /// Add a WHERE LIKE condition
    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.push_condition(column, QueryOperator::Like, Some(Value::String(pattern.into())))
    }

    /// Add a WHERE IN condition over a value list
    pub fn where_in(mut self, column: &str, values: Vec<Value>) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::In,
            value: None,
            values,
        });
        self
    }

    /// Add a WHERE IS NULL condition
    pub fn where_null(self, column: &str) -> Self {
        self.push_condition(column, QueryOperator::IsNull, None)
    }

    /// Add a WHERE IS NOT NULL condition
    pub fn where_not_null(self, column: &str) -> Self {
        self.push_condition(column, QueryOperator::IsNotNull, None)
    }

    /// Add INNER JOIN to a plain table
    pub fn join(mut self, table: &str, left_col: &str, right_col: &str) -> Self {
        self.joins.push(JoinClause {
            join_type: JoinType::Inner,
            target: JoinTarget::Table(table.to_string()),
            alias: None,
            on_conditions: vec![(left_col.to_string(), right_col.to_string())],
        });
        self
    }

    /// Add LEFT JOIN to a plain table
    pub fn left_join(mut self, table: &str, left_col: &str, right_col: &str) -> Self {
        self.joins.push(JoinClause {
            join_type: JoinType::Left,
            target: JoinTarget::Table(table.to_string()),
            alias: None,
            on_conditions: vec![(left_col.to_string(), right_col.to_string())],
        });
        self
    }

    /// Add INNER JOIN to a derived table built from another query
    pub fn join_subquery(
        mut self,
        subquery: QueryBuilder,
        alias: &str,
        left_col: &str,
        right_col: &str,
    ) -> Self {
        self.joins.push(JoinClause {
            join_type: JoinType::Inner,
            target: JoinTarget::Subquery(Box::new(subquery)),
            alias: Some(alias.to_string()),
            on_conditions: vec![(left_col.to_string(), right_col.to_string())],
        });
        self
    }

    /// Append an ORDER BY directive (last directive lowest priority)
    pub fn order_by(mut self, directive: SortDirective) -> Self {
        self.order_by.push(directive);
        self
    }

    /// Append an ORDER BY column with an explicit direction
    pub fn order_by_column(self, column: &str, direction: OrderDirection) -> Self {
        self.order_by(SortDirective {
            column: column.to_string(),
            direction,
        })
    }

    /// Whether any WHERE condition has been applied
    pub fn is_filtered(&self) -> bool {
        !self.where_conditions.is_empty()
    }

    /// Whether any ORDER BY directive has been applied
    pub fn is_sorted(&self) -> bool {
        !self.order_by.is_empty()
    }
}
