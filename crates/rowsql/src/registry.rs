//! Static registry of derived record schemas.
//!
//! Every `#[derive(Record)]` submits a [`RecordRegistration`] through
//! `inventory`, so schemas can be looked up by table or type name without a
//! hand-maintained list.
//!
//! ```ignore
//! let schema = rowsql::registry::find_by_table("members").expect("Member is derived");
//! let sql = builder.build_select_from_schema(schema, schema.table, &[])?;
//! ```

use crate::schema::RecordSchema;

/// Registration entry emitted by `#[derive(Record)]`.
pub struct RecordRegistration {
    /// Returns the record's schema.
    pub schema_fn: fn() -> &'static RecordSchema,
}

inventory::collect!(RecordRegistration);

/// Every registered schema, in unspecified order.
pub fn records() -> impl Iterator<Item = &'static RecordSchema> {
    inventory::iter::<RecordRegistration>
        .into_iter()
        .map(|r| (r.schema_fn)())
}

/// First registered schema whose default table is `table`.
pub fn find_by_table(table: &str) -> Option<&'static RecordSchema> {
    records().find(|s| s.table == table)
}

/// Registered schema of the type named `type_name`.
pub fn find_by_type(type_name: &str) -> Option<&'static RecordSchema> {
    records().find(|s| s.type_name == type_name)
}
