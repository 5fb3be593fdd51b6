//! Convenient re-exports for common rowsql usage.
//!
//! ```ignore
//! use rowsql::prelude::*;
//! ```

pub use crate::builder::{MutationMode, StatementBuilder};
pub use crate::config::BuilderConfig;
pub use crate::error::RowsqlError;
pub use crate::row::{FromRow, RowExt};
pub use crate::schema::{Record, RecordSchema};
pub use crate::skip::SkipColumns;
pub use crate::statement::Statement;

#[cfg(feature = "derive")]
pub use rowsql_derive::{FromRow, Record};
