//! Record schema descriptors and column introspection.
//!
//! A [`RecordSchema`] is the static description of one record type: its table,
//! and for every declared field the column tag and primary-key tag it carries.
//! `#[derive(Record)]` emits one per type; it can also be written by hand:
//!
//! ```ignore
//! use rowsql::{FieldDescriptor, RecordSchema};
//!
//! static MEMBER_FIELDS: [FieldDescriptor; 3] = [
//!     FieldDescriptor::new("member_id").primary_key("member_id"),
//!     FieldDescriptor::new("first_name").column("first_name"),
//!     FieldDescriptor::new("email").column("email"),
//! ];
//! static MEMBER: RecordSchema = RecordSchema::new("Member", "members", &MEMBER_FIELDS);
//!
//! let cols = MEMBER.columns();
//! assert_eq!(cols.data_columns, ["first_name", "email"]);
//! assert_eq!(cols.primary_key, "member_id");
//! ```
//!
//! Two introspection views exist and intentionally disagree on composite keys:
//! [`RecordSchema::columns`] keeps only the last primary-key tag (SELECT/DELETE),
//! while [`RecordSchema::primary_keys`] returns all of them (UPDATE predicates).

use crate::error::Result;
use serde_json::{Map, Value};

/// Tags carried by one declared field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Key of the field in its serde representation: the field name unless renamed.
    pub serde_name: &'static str,
    /// Column tag (`#[orm(column = "...")]`).
    pub column: Option<&'static str>,
    /// Primary-key tag (`#[orm(pk = "...")]`).
    pub primary_key: Option<&'static str>,
}

impl FieldDescriptor {
    /// An unmapped field. Add tags with [`column`](Self::column) / [`primary_key`](Self::primary_key).
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            serde_name: name,
            column: None,
            primary_key: None,
        }
    }

    /// Set the serde key, for fields with `#[serde(rename = "...")]`.
    pub const fn serde_name(mut self, key: &'static str) -> Self {
        self.serde_name = key;
        self
    }

    /// Set the column tag.
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    /// Set the primary-key tag.
    pub const fn primary_key(mut self, column: &'static str) -> Self {
        self.primary_key = Some(column);
        self
    }

    /// Whether the field carries any tag at all.
    pub const fn is_mapped(&self) -> bool {
        self.column.is_some() || self.primary_key.is_some()
    }

    /// Column name under which this field's value appears in a record's values.
    ///
    /// The column tag wins; a pk-only field is keyed by its pk tag.
    pub fn value_key(&self) -> Option<&'static str> {
        self.column.or(self.primary_key)
    }
}

/// Static description of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    /// Rust type name, used in error messages.
    pub type_name: &'static str,
    /// Default table name.
    pub table: &'static str,
    /// Declared fields, in declaration order (unmapped fields included).
    pub fields: &'static [FieldDescriptor],
}

/// Data columns plus the single primary-key column of a record type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    /// Column-tagged fields, in declaration order.
    pub data_columns: Vec<String>,
    /// Last primary-key tag seen; empty when the type has none.
    pub primary_key: String,
}

impl ColumnSet {
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    /// Data columns joined as a SELECT list.
    pub fn select_list(&self) -> String {
        self.data_columns.join(", ")
    }
}

/// Flattened per-column view of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub column_name: String,
    pub is_primary_key: bool,
}

impl RecordSchema {
    pub const fn new(
        type_name: &'static str,
        table: &'static str,
        fields: &'static [FieldDescriptor],
    ) -> Self {
        Self {
            type_name,
            table,
            fields,
        }
    }

    /// Scan fields in declaration order into data columns and a primary key.
    ///
    /// A pk-tagged field sets the primary key whether or not it also has a
    /// column tag. With several pk tags the last one wins.
    pub fn columns(&self) -> ColumnSet {
        let mut set = ColumnSet {
            data_columns: Vec::with_capacity(self.fields.len()),
            primary_key: String::new(),
        };
        for field in self.fields {
            if let Some(column) = field.column {
                set.data_columns.push(column.to_string());
            }
            if let Some(pk) = field.primary_key {
                set.primary_key = pk.to_string();
            }
        }
        set
    }

    /// Every primary-key tag, in declaration order.
    pub fn primary_keys(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter_map(|f| f.primary_key)
            .map(str::to_string)
            .collect()
    }

    /// Whether `column` is one of the primary-key tags.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.fields.iter().any(|f| f.primary_key == Some(column))
    }

    /// One descriptor per mapped field, in declaration order.
    pub fn descriptors(&self) -> Vec<ColumnDescriptor> {
        self.fields
            .iter()
            .filter_map(|f| {
                f.value_key().map(|column| ColumnDescriptor {
                    column_name: column.to_string(),
                    is_primary_key: f.primary_key.is_some(),
                })
            })
            .collect()
    }

    /// Whether any field carries a tag.
    pub fn has_mapped_fields(&self) -> bool {
        self.fields.iter().any(FieldDescriptor::is_mapped)
    }

    /// The mapped field whose values appear under `column`.
    pub fn field_for_column(&self, column: &str) -> Option<&'static FieldDescriptor> {
        let fields: &'static [FieldDescriptor] = self.fields;
        fields.iter().find(|f| f.value_key() == Some(column))
    }

    /// Rename the keys of an external record representation onto the serde
    /// keys of the declared fields, ignoring ASCII case.
    ///
    /// A key that already matches a field exactly is kept and takes precedence
    /// over keys that only match after folding. Keys matching no field pass
    /// through unchanged.
    pub fn fold_keys(&self, map: Map<String, Value>) -> Map<String, Value> {
        let mut folded = Map::with_capacity(map.len());
        let mut pending = Vec::new();
        for (key, value) in map {
            if self.fields.iter().any(|f| f.serde_name == key) {
                folded.insert(key, value);
            } else {
                pending.push((key, value));
            }
        }

        for (key, value) in pending {
            match self
                .fields
                .iter()
                .find(|f| f.serde_name.eq_ignore_ascii_case(&key))
            {
                Some(field) => {
                    if !folded.contains_key(field.serde_name) {
                        folded.insert(field.serde_name.to_string(), value);
                    }
                }
                None => {
                    folded.insert(key, value);
                }
            }
        }
        folded
    }
}

/// Column name → value mapping of one record instance.
///
/// Entries keep insertion order; inserting an existing column replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordValues {
    entries: Map<String, Value>,
}

impl RecordValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Map::with_capacity(capacity),
        }
    }

    /// Insert a column value, replacing any previous value for the column.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.entries.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for RecordValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Map<String, Value>> for RecordValues {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for RecordValues {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A record type with a static schema.
///
/// Implemented by `#[derive(Record)]`.
pub trait Record {
    /// The type's schema descriptor.
    fn schema() -> &'static RecordSchema;

    /// Values of every mapped field, keyed by [`FieldDescriptor::value_key`].
    fn column_values(&self) -> Result<RecordValues>;
}

/// Data columns and primary key of `T`. See [`RecordSchema::columns`].
pub fn columns<T: Record>() -> ColumnSet {
    T::schema().columns()
}

/// All primary-key tags of `T`. See [`RecordSchema::primary_keys`].
pub fn primary_keys<T: Record>() -> Vec<String> {
    T::schema().primary_keys()
}
