//! Attribute parsing shared by the `Record` and `FromRow` derives.
//!
//! Handles struct-level `#[orm(table = "...")]` and field-level
//! `#[orm(column = "...", pk = "...")]`.

use heck::ToSnakeCase;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Data, DeriveInput, Field, Fields, Result};

/// Tags on one field. Several `#[orm(...)]` attributes on a field are merged.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldAttr {
    pub column: Option<String>,
    pub pk: Option<String>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            let _: syn::Token![=] = input.parse()?;
            let value: syn::LitStr = input.parse()?;

            if value.value().is_empty() {
                return Err(syn::Error::new_spanned(
                    &value,
                    format!("`{key}` must not be empty"),
                ));
            }

            let slot = if key == "column" {
                &mut attr.column
            } else if key == "pk" {
                &mut attr.pk
            } else {
                return Err(syn::Error::new_spanned(
                    &key,
                    "unknown field attribute, expected `column` or `pk`",
                ));
            };
            if slot.is_some() {
                return Err(syn::Error::new_spanned(&key, format!("duplicate `{key}`")));
            }
            *slot = Some(value.value());

            if input.is_empty() {
                break;
            }
            let _: syn::Token![,] = input.parse()?;
        }

        Ok(attr)
    }
}

/// A named struct field with its tags.
pub(crate) struct TaggedField<'a> {
    pub ident: &'a syn::Ident,
    pub attr: FieldAttr,
    /// Key serde uses for the field.
    pub serde_name: String,
}

impl TaggedField<'_> {
    /// Key of the field's value: the column tag, else the pk tag.
    pub fn value_key(&self) -> Option<&str> {
        self.attr.column.as_deref().or(self.attr.pk.as_deref())
    }
}

/// Named fields of a struct, or an error naming the derive.
pub(crate) fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}

/// Parse every field's `#[orm(...)]` tags, in declaration order.
pub(crate) fn tagged_fields<'a>(
    fields: &'a Punctuated<Field, Comma>,
) -> Result<Vec<TaggedField<'a>>> {
    fields
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            Ok(TaggedField {
                ident,
                attr: field_attr(field)?,
                serde_name: serde_name(field, ident),
            })
        })
        .collect()
}

fn field_attr(field: &Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("orm")) {
        let parsed: FieldAttr = attr.parse_args()?;
        if parsed.column.is_some() {
            if merged.column.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate `column`"));
            }
            merged.column = parsed.column;
        }
        if parsed.pk.is_some() {
            if merged.pk.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate `pk`"));
            }
            merged.pk = parsed.pk;
        }
    }
    Ok(merged)
}

/// Deserialization key of a field: `#[serde(rename = "...")]` or
/// `#[serde(rename(deserialize = "..."))]`, else the field name without `r#`.
///
/// Container-level `rename_all` is not applied.
fn serde_name(field: &Field, ident: &syn::Ident) -> String {
    let mut rename = None;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("serde")) {
        // Malformed serde attributes are reported by serde's own derive.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(syn::Token![=]) {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    rename = Some(lit.value());
                } else {
                    meta.parse_nested_meta(|inner| {
                        let lit: syn::LitStr = inner.value()?.parse()?;
                        if inner.path.is_ident("deserialize") {
                            rename = Some(lit.value());
                        }
                        Ok(())
                    })?;
                }
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        });
    }
    rename.unwrap_or_else(|| ident.unraw().to_string())
}

/// Table name from `#[orm(table = "...")]`, defaulting to the snake_case type name.
pub(crate) fn table_name(input: &DeriveInput) -> Result<String> {
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("orm")) {
        let nested: syn::MetaNameValue = attr.parse_args()?;
        if !nested.path.is_ident("table") {
            return Err(syn::Error::new_spanned(
                &nested.path,
                "unknown struct attribute, expected `table`",
            ));
        }
        if let syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) = &nested.value
        {
            return Ok(lit.value());
        }
        return Err(syn::Error::new_spanned(
            &nested.value,
            "`table` expects a string literal",
        ));
    }
    Ok(input.ident.to_string().to_snake_case())
}
