//! Builder configuration.
//!
//! Loaded once at start-up and handed to [`StatementBuilder::new`](crate::StatementBuilder::new).
//!
//! ```toml
//! # rowsql.toml
//! skip_columns = "created_at, updated_at"
//! ```

use crate::error::{Result, RowsqlError};
use crate::ident::Ident;
use crate::skip::SkipColumns;
use serde::Deserialize;
use std::path::Path;

/// Environment variable read by [`BuilderConfig::from_env`].
pub const SKIP_COLUMNS_ENV: &str = "ROWSQL_SKIP_COLUMNS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuilderConfig {
    /// Columns never written by INSERT/UPDATE.
    #[serde(default)]
    pub skip_columns: SkipColumns,
}

impl BuilderConfig {
    pub fn new(skip_columns: SkipColumns) -> Self {
        Self { skip_columns }
    }

    /// Shorthand for a config with a comma-separated skip list.
    pub fn with_skip_columns(list: &str) -> Self {
        Self::new(SkipColumns::parse(list))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: BuilderConfig = toml::from_str(raw)
            .map_err(|e| RowsqlError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RowsqlError::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            RowsqlError::Config(msg) => {
                RowsqlError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Read `ROWSQL_SKIP_COLUMNS`; an unset variable means no skipped columns.
    pub fn from_env() -> Result<Self> {
        match std::env::var(SKIP_COLUMNS_ENV) {
            Ok(list) => {
                let config = Self::with_skip_columns(&list);
                config.validate()?;
                Ok(config)
            }
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(RowsqlError::config(format!("{SKIP_COLUMNS_ENV}: {e}"))),
        }
    }

    /// Every non-empty skip entry must be a valid column identifier.
    pub fn validate(&self) -> Result<()> {
        for column in self.skip_columns.iter().filter(|c| !c.is_empty()) {
            Ident::parse(column).map_err(|e| {
                RowsqlError::config(format!("invalid skip column '{column}': {e}"))
            })?;
        }
        Ok(())
    }
}
