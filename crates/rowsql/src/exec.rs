//! Running built statements.
//!
//! Thin helpers over `tokio_postgres::GenericClient` (a `Client` or a
//! `Transaction`). Connections, pools and transactions stay with the caller.
//!
//! ```ignore
//! let stmt = builder.prepare_select::<Member>("members", &[3, 7])?;
//! let members: Vec<Member> = rowsql::exec::fetch_all(&client, &stmt).await?;
//! ```

use crate::error::{Result, RowsqlError};
use crate::row::FromRow;
use crate::statement::Statement;
use tokio_postgres::GenericClient;

/// Execute a parameterized statement, returning the affected row count.
pub async fn execute<C: GenericClient>(client: &C, stmt: &Statement) -> Result<u64> {
    tracing::debug!(
        target: "rowsql.sql",
        sql = stmt.sql(),
        params = stmt.params().len(),
        "executing statement"
    );
    Ok(client.execute(stmt.sql(), &stmt.param_refs()).await?)
}

/// Run a parameterized query and map every row.
pub async fn fetch_all<T, C>(client: &C, stmt: &Statement) -> Result<Vec<T>>
where
    T: FromRow,
    C: GenericClient,
{
    tracing::debug!(
        target: "rowsql.sql",
        sql = stmt.sql(),
        params = stmt.params().len(),
        "fetching rows"
    );
    let rows = client.query(stmt.sql(), &stmt.param_refs()).await?;
    rows.iter().map(T::from_row).collect()
}

/// Execute inline statement text verbatim.
///
/// An empty string (the unsupported-mode sentinel of
/// [`build_mutation_token`](crate::StatementBuilder::build_mutation_token)) is
/// rejected rather than sent.
pub async fn execute_text<C: GenericClient>(client: &C, sql: &str) -> Result<u64> {
    ensure_not_empty(sql)?;
    tracing::debug!(target: "rowsql.sql", sql, "executing inline statement");
    Ok(client.execute(sql, &[]).await?)
}

/// Run inline query text verbatim and map every row.
pub async fn fetch_all_text<T, C>(client: &C, sql: &str) -> Result<Vec<T>>
where
    T: FromRow,
    C: GenericClient,
{
    ensure_not_empty(sql)?;
    tracing::debug!(target: "rowsql.sql", sql, "fetching rows (inline)");
    let rows = client.query(sql, &[]).await?;
    rows.iter().map(T::from_row).collect()
}

fn ensure_not_empty(sql: &str) -> Result<()> {
    if sql.trim().is_empty() {
        return Err(RowsqlError::validation("refusing to execute an empty statement"));
    }
    Ok(())
}
