//! Query Execution - The retrieval boundary
//!
//! The loading core executes composed queries through the `QueryExecutor`
//! trait; `PostgresExecutor` is the production implementation over a sqlx
//! pool. Rows come back as JSON objects keyed by column name.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Column, Pool, Postgres, Row};

use crate::error::{LoaderError, LoaderResult};

use super::builder::QueryBuilder;

/// Executes composed queries and yields result rows
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute the query once and return every result row
    async fn fetch_all(&self, query: &QueryBuilder) -> LoaderResult<Vec<JsonValue>>;
}

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: 30,
        }
    }
}

/// PostgreSQL-backed query executor
pub struct PostgresExecutor {
    pool: Arc<Pool<Postgres>>,
}

impl PostgresExecutor {
    /// Wrap an existing pool
    pub fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }

    /// Create a pool from a database URL and wrap it
    pub async fn connect(database_url: &str, config: &PoolConfig) -> LoaderResult<Self> {
        tracing::debug!(
            "Creating database pool with config: max={}, min={}, timeout={}s",
            config.max_connections,
            config.min_connections,
            config.acquire_timeout
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout))
            .connect(database_url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                LoaderError::execution(format!("failed to create database pool: {}", e))
            })?;

        tracing::info!(
            "Database pool created with {} max connections",
            config.max_connections
        );
        Ok(Self::new(Arc::new(pool)))
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    async fn fetch_all(&self, query: &QueryBuilder) -> LoaderResult<Vec<JsonValue>> {
        let (sql, params) = query.to_sql_with_params()?;
        tracing::debug!("Executing combined relation query: {}", sql);

        let mut db_query = sqlx::query(&sql);
        for param in &params {
            db_query = match param {
                JsonValue::Null => db_query.bind(None::<i64>),
                JsonValue::Bool(b) => db_query.bind(*b),
                JsonValue::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        db_query.bind(i)
                    } else if let Some(f) = n.as_f64() {
                        db_query.bind(f)
                    } else {
                        return Err(LoaderError::execution("unsupported numeric parameter"));
                    }
                }
                JsonValue::String(s) => db_query.bind(s.clone()),
                other => {
                    return Err(LoaderError::execution(format!(
                        "unsupported parameter type: {}",
                        other
                    )))
                }
            };
        }

        let rows = db_query
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(|e| LoaderError::execution(format!("combined query failed: {}", e)))?;

        rows.iter().map(row_to_json).collect()
    }
}

/// Convert a PostgreSQL row to a JSON object keyed by column name
fn row_to_json(row: &PgRow) -> LoaderResult<JsonValue> {
    let mut map = serde_json::Map::new();

    for (i, column) in row.columns().iter().enumerate() {
        let json_value = if let Ok(value) = row.try_get::<Option<i64>, _>(i) {
            value.map_or(JsonValue::Null, |v| {
                JsonValue::Number(serde_json::Number::from(v))
            })
        } else if let Ok(value) = row.try_get::<Option<i32>, _>(i) {
            value.map_or(JsonValue::Null, |v| {
                JsonValue::Number(serde_json::Number::from(v))
            })
        } else if let Ok(value) = row.try_get::<Option<String>, _>(i) {
            value.map_or(JsonValue::Null, JsonValue::String)
        } else if let Ok(value) = row.try_get::<Option<bool>, _>(i) {
            value.map_or(JsonValue::Null, JsonValue::Bool)
        } else if let Ok(value) = row.try_get::<Option<f64>, _>(i) {
            value
                .and_then(serde_json::Number::from_f64)
                .map_or(JsonValue::Null, JsonValue::Number)
        } else if let Ok(value) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(i) {
            value.map_or(JsonValue::Null, |v| JsonValue::String(v.to_rfc3339()))
        } else if let Ok(value) = row.try_get::<Option<uuid::Uuid>, _>(i) {
            value.map_or(JsonValue::Null, |v| JsonValue::String(v.to_string()))
        } else if let Ok(value) = row.try_get::<Option<JsonValue>, _>(i) {
            value.unwrap_or(JsonValue::Null)
        } else {
            return Err(LoaderError::execution(format!(
                "unsupported column type for '{}'",
                column.name()
            )));
        };

        map.insert(column.name().to_string(), json_value);
    }

    Ok(JsonValue::Object(map))
}
