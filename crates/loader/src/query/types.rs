//! Query Builder Types - Core types and enums for query building

use std::fmt;

use serde_json::Value;

use crate::error::{LoaderError, LoaderResult};

use super::builder::QueryBuilder;

/// Query operator types
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    In,
    IsNull,
    IsNotNull,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equal => write!(f, "="),
            QueryOperator::NotEqual => write!(f, "!="),
            QueryOperator::GreaterThan => write!(f, ">"),
            QueryOperator::GreaterThanOrEqual => write!(f, ">="),
            QueryOperator::LessThan => write!(f, "<"),
            QueryOperator::LessThanOrEqual => write!(f, "<="),
            QueryOperator::Like => write!(f, "LIKE"),
            QueryOperator::In => write!(f, "IN"),
            QueryOperator::IsNull => write!(f, "IS NULL"),
            QueryOperator::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// Where clause condition
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Option<Value>,
    /// Operand list for IN
    pub values: Vec<Value>,
}

/// Join types
#[derive(Debug, Clone, PartialEq)]
pub enum JoinType {
    Inner,
    Left,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
        }
    }
}

/// What a join attaches: a plain table or a derived table
#[derive(Debug, Clone, PartialEq)]
pub enum JoinTarget {
    Table(String),
    Subquery(Box<QueryBuilder>),
}

/// Join clause
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub target: JoinTarget,
    /// Required alias for derived tables, optional for plain tables
    pub alias: Option<String>,
    /// (left_column, right_column) equality pairs
    pub on_conditions: Vec<(String, String)>,
}

/// Order by direction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One sort-column directive, applied in declared priority order
#[derive(Debug, Clone, PartialEq)]
pub struct SortDirective {
    pub column: String,
    pub direction: OrderDirection,
}

impl SortDirective {
    /// Create an ascending directive
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Create a descending directive
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Desc,
        }
    }

    /// Parse the wire form: `"column"` ascending, `"-column"` descending
    pub fn parse(raw: &str) -> LoaderResult<Self> {
        let raw = raw.trim();
        let (column, direction) = match raw.strip_prefix('-') {
            Some(rest) => (rest, OrderDirection::Desc),
            None => (raw, OrderDirection::Asc),
        };
        if column.is_empty() {
            return Err(LoaderError::query("empty sort directive"));
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(QueryOperator::Equal.to_string(), "=");
        assert_eq!(QueryOperator::In.to_string(), "IN");
        assert_eq!(QueryOperator::IsNull.to_string(), "IS NULL");
    }

    #[test]
    fn test_sort_directive_parse() {
        let asc = SortDirective::parse("title").unwrap();
        assert_eq!(asc, SortDirective::asc("title"));

        let desc = SortDirective::parse("-created_at").unwrap();
        assert_eq!(desc, SortDirective::desc("created_at"));
        assert_eq!(desc.to_string(), "created_at DESC");

        assert!(SortDirective::parse("-").is_err());
        assert!(SortDirective::parse("  ").is_err());
    }
}
