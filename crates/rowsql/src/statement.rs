//! Parameterized statements.

use crate::value::BindValue;
use std::fmt;
use tokio_postgres::types::ToSql;

/// SQL text with `$1, $2, ...` placeholders plus the values bound to them.
///
/// Produced by the `prepare_*` methods of
/// [`StatementBuilder`](crate::StatementBuilder); the text has the same shape
/// as the inline `build_*` output with each literal replaced by a placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct Statement {
    sql: String,
    params: Vec<BindValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind a value and return its placeholder (`$n`, 1-based).
    pub(crate) fn bind(&mut self, value: impl Into<BindValue>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }

    pub(crate) fn set_sql(&mut self, sql: String) {
        self.sql = sql;
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[BindValue] {
        &self.params
    }

    /// Parameters as references for `tokio_postgres` calls.
    pub fn param_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    pub fn into_parts(self) -> (String, Vec<BindValue>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
