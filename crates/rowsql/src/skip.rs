//! Columns excluded from INSERT/UPDATE value lists.

use serde::{Deserialize, Deserializer};

/// Set of column names that INSERT and UPDATE statements never write,
/// typically server-generated audit columns such as `created_at`.
///
/// Built once (from configuration) and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipColumns {
    columns: Vec<String>,
}

impl SkipColumns {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list, trimming whitespace around each entry.
    ///
    /// ```ignore
    /// let skip = SkipColumns::parse("created_at, updated_at");
    /// assert!(skip.is_skipped("updated_at"));
    /// ```
    pub fn parse(list: &str) -> Self {
        Self {
            columns: list.split(',').map(|c| c.trim().to_string()).collect(),
        }
    }

    /// Exact membership test.
    pub fn is_skipped(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SkipColumns {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|c| c.into().trim().to_string()).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for SkipColumns {
    /// Accepts either `"a, b"` or `["a", "b"]`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(String),
            Seq(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::List(list) => SkipColumns::parse(&list),
            Repr::Seq(seq) => seq.into_iter().collect(),
        })
    }
}
