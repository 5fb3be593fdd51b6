//! Derive macros for rowsql
//!
//! Provides `#[derive(Record)]` and `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod from_row;
mod record;

/// Derive `Record` (schema descriptor + column values) for a struct.
///
/// # Example
///
/// ```ignore
/// use rowsql::Record;
///
/// #[derive(Serialize, Deserialize, Record)]
/// #[orm(table = "members")]
/// struct Member {
///     #[orm(pk = "member_id")]
///     member_id: i64,
///     #[orm(column = "first_name")]
///     first_name: String,
///     // no tag: ignored by rowsql
///     session_token: String,
/// }
/// ```
///
/// # Generated
///
/// - `impl rowsql::Record` with a `'static` schema
/// - `TABLE: &'static str` - Table name
/// - an `inventory` registration (non-generic types only)
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (defaults to the snake_case struct name)
/// - `#[orm(column = "name")]` - Map the field to a data column
/// - `#[orm(pk = "name")]` - Mark the field as primary key `name`
///
/// Column values are produced with `serde_json::to_value`, so every tagged
/// field's type must implement `Serialize`.
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` for a struct.
///
/// Tagged fields are read from the column named by their `column` tag (or
/// `pk` tag); untagged fields are set to `Default::default()`.
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
