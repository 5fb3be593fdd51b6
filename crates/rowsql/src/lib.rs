//! # rowsql
//!
//! SQL statements for annotated record types, without hand-written per-entity SQL.
//!
//! ## Features
//!
//! - **Schema from annotations**: `#[derive(Record)]` compiles `column` / `pk`
//!   field tags into a static [`RecordSchema`]
//! - **Four shapes**: SELECT (optionally by id list), DELETE by id, INSERT and
//!   UPDATE from a JSON record representation
//! - **Skip columns**: configured columns (audit timestamps, ...) are never written
//! - **Parameterized rendering**: every shape also renders with `$n`
//!   placeholders and bound values
//! - **Explicit failures**: undecodable records, untagged types and missing
//!   primary keys are errors, not malformed SQL
//!
//! ## Example
//!
//! ```ignore
//! use rowsql::prelude::*;
//!
//! #[derive(Debug, Serialize, Deserialize, Record)]
//! #[orm(table = "members")]
//! struct Member {
//!     #[orm(pk = "member_id")]
//!     member_id: i64,
//!     #[orm(column = "first_name")]
//!     first_name: String,
//!     #[orm(column = "email")]
//!     email: String,
//! }
//!
//! let builder = StatementBuilder::new(BuilderConfig::with_skip_columns("created_at"));
//!
//! builder.build_select::<Member>("members", &[3, 7])?;
//! // SELECT first_name, email FROM members WHERE member_id IN (3,7)
//!
//! builder.build_mutation::<Member>("members", json, MutationMode::Update)?;
//! // UPDATE members SET first_name = 'Ada', email = 'ada@example.com' WHERE member_id = 3
//! ```
//!
//! ## Inline literals
//!
//! The `build_*` methods embed values as literals and **do not escape quotes**
//! (see [`literal`]). Validate values yourself before using them, or use the
//! `prepare_*` methods, which return a [`Statement`] with bound parameters.

pub mod builder;
pub mod config;
pub mod error;
pub mod exec;
pub mod ident;
pub mod literal;
pub mod registry;
pub mod row;
pub mod schema;
pub mod skip;
pub mod statement;
pub mod value;

pub mod prelude;

pub use builder::{MutationMode, StatementBuilder};
pub use config::BuilderConfig;
pub use error::{Result, RowsqlError};
pub use ident::Ident;
pub use literal::{Literal, is_numeric, render_literal};
pub use registry::RecordRegistration;
pub use row::{FromRow, RowExt};
pub use schema::{
    ColumnDescriptor, ColumnSet, FieldDescriptor, Record, RecordSchema, RecordValues, columns,
    primary_keys,
};
pub use skip::SkipColumns;
pub use statement::Statement;
pub use value::BindValue;

#[cfg(feature = "derive")]
pub use rowsql_derive::{FromRow, Record};

// Re-exported for derive-generated code
pub use inventory;
pub use serde_json;
pub use tokio_postgres;
