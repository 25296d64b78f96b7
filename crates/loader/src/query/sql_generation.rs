//! Query Builder SQL generation
//!
//! Renders `$n` placeholders with numbering continuous across nested derived
//! tables: join subqueries render before the outer WHERE, so their parameters
//! come first in the bound list.

use serde_json::Value;

use crate::error::{LoaderError, LoaderResult};

use super::builder::QueryBuilder;
use super::types::*;

impl QueryBuilder {
    /// Generate SQL with `$n` placeholders and the parameters to bind
    pub fn to_sql_with_params(&self) -> LoaderResult<(String, Vec<Value>)> {
        let mut params = Vec::new();
        let mut param_counter = 1usize;
        let sql = self.render(&mut params, &mut param_counter)?;
        Ok((sql, params))
    }

    fn render(&self, params: &mut Vec<Value>, param_counter: &mut usize) -> LoaderResult<String> {
        let table = self
            .from_table
            .as_ref()
            .ok_or_else(|| LoaderError::query("SELECT requires a FROM table"))?;

        let mut sql = String::from("SELECT ");
        if self.select_fields.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_fields.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(table);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.join_type.to_string());
            sql.push(' ');
            match &join.target {
                JoinTarget::Table(table) => sql.push_str(table),
                JoinTarget::Subquery(subquery) => {
                    let alias = join.alias.as_ref().ok_or_else(|| {
                        LoaderError::query("derived-table join requires an alias")
                    })?;
                    let inner = subquery.render(params, param_counter)?;
                    sql.push('(');
                    sql.push_str(&inner);
                    sql.push_str(") AS ");
                    sql.push_str(alias);
                }
            }
            if let (JoinTarget::Table(_), Some(alias)) = (&join.target, &join.alias) {
                sql.push_str(" AS ");
                sql.push_str(alias);
            }
            if !join.on_conditions.is_empty() {
                sql.push_str(" ON ");
                for (i, (left, right)) in join.on_conditions.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(" AND ");
                    }
                    sql.push_str(&format!("{} = {}", left, right));
                }
            }
        }

        self.render_where_clause(&mut sql, params, param_counter)?;

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let directives: Vec<String> =
                self.order_by.iter().map(|d| d.to_string()).collect();
            sql.push_str(&directives.join(", "));
        }

        Ok(sql)
    }

    fn render_where_clause(
        &self,
        sql: &mut String,
        params: &mut Vec<Value>,
        param_counter: &mut usize,
    ) -> LoaderResult<()> {
        if self.where_conditions.is_empty() {
            return Ok(());
        }
        sql.push_str(" WHERE ");
        for (i, condition) in self.where_conditions.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            sql.push_str(&condition.column);
            sql.push(' ');
            match condition.operator {
                QueryOperator::In => {
                    if condition.values.is_empty() {
                        return Err(LoaderError::query(format!(
                            "IN condition on '{}' requires at least one value",
                            condition.column
                        )));
                    }
                    sql.push_str("IN (");
                    for (j, value) in condition.values.iter().enumerate() {
                        if j > 0 {
                            sql.push_str(", ");
                        }
                        sql.push_str(&format!("${}", param_counter));
                        params.push(value.clone());
                        *param_counter += 1;
                    }
                    sql.push(')');
                }
                QueryOperator::IsNull | QueryOperator::IsNotNull => {
                    sql.push_str(&condition.operator.to_string());
                }
                _ => {
                    let value = condition.value.as_ref().ok_or_else(|| {
                        LoaderError::query(format!(
                            "condition on '{}' is missing its operand",
                            condition.column
                        ))
                    })?;
                    sql.push_str(&condition.operator.to_string());
                    sql.push_str(&format!(" ${}", param_counter));
                    params.push(value.clone());
                    *param_counter += 1;
                }
            }
        }
        Ok(())
    }
}
