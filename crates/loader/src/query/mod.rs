//! Query Composition - SELECT-only builder, combined-query composer, and the
//! execution boundary

pub mod builder;
pub mod composer;
pub mod execution;
pub mod sql_generation;
pub mod types;

pub use builder::QueryBuilder;
pub use composer::{QueryComposer, CHILD_ALIAS, PARENT_KEY_COLUMN};
pub use execution::{PoolConfig, PostgresExecutor, QueryExecutor};
pub use types::{
    JoinClause, JoinTarget, JoinType, OrderDirection, QueryOperator, SortDirective, WhereCondition,
};
