//! Record derive macro implementation

use crate::attrs::{named_fields, table_name, tagged_fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let table = table_name(&input)?;
    let fields = tagged_fields(named_fields(&input, "Record")?)?;
    let type_name = name.to_string();

    let descriptors = fields.iter().map(|f| {
        let field_name = f.ident.unraw().to_string();
        let serde_name = &f.serde_name;
        let column = option_tokens(f.attr.column.as_deref());
        let pk = option_tokens(f.attr.pk.as_deref());
        quote! {
            rowsql::FieldDescriptor {
                name: #field_name,
                serde_name: #serde_name,
                column: #column,
                primary_key: #pk,
            }
        }
    });
    let field_count = fields.len();

    let value_inserts: Vec<_> = fields
        .iter()
        .filter_map(|f| {
            let key = f.value_key()?;
            let ident = f.ident;
            Some(quote! {
                values.insert(#key, rowsql::serde_json::to_value(&self.#ident)?);
            })
        })
        .collect();
    let mapped_count = value_inserts.len();

    // inventory needs a concrete type.
    let registration = if input.generics.params.is_empty() {
        quote! {
            rowsql::inventory::submit! {
                rowsql::RecordRegistration {
                    schema_fn: <#name as rowsql::Record>::schema,
                }
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            pub const TABLE: &'static str = #table;
        }

        impl #impl_generics rowsql::Record for #name #ty_generics #where_clause {
            fn schema() -> &'static rowsql::RecordSchema {
                static FIELDS: [rowsql::FieldDescriptor; #field_count] = [#(#descriptors),*];
                static SCHEMA: rowsql::RecordSchema = rowsql::RecordSchema {
                    type_name: #type_name,
                    table: #table,
                    fields: &FIELDS,
                };
                &SCHEMA
            }

            #[allow(unused_mut)]
            fn column_values(&self) -> rowsql::Result<rowsql::RecordValues> {
                let mut values = rowsql::RecordValues::with_capacity(#mapped_count);
                #(#value_inserts)*
                Ok(values)
            }
        }

        #registration
    })
}

fn option_tokens(value: Option<&str>) -> TokenStream {
    match value {
        Some(v) => quote! { ::core::option::Option::Some(#v) },
        None => quote! { ::core::option::Option::None },
    }
}
