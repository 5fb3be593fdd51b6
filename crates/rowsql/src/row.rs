//! Row → record mapping.

use crate::error::{Result, RowsqlError};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Build a record from a result row.
///
/// `#[derive(FromRow)]` reads every mapped field from the column named by its
/// `column` tag (or `pk` tag when it has no column tag) and fills unmapped
/// fields with `Default::default()`.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

/// Column access with rowsql errors.
pub trait RowExt {
    /// Read `column`, reporting the column name on failure.
    fn try_get_column<'a, T>(&'a self, column: &str) -> Result<T>
    where
        T: FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<'a, T>(&'a self, column: &str) -> Result<T>
    where
        T: FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| RowsqlError::column(column, e.to_string()))
    }
}
