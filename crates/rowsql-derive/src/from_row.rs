//! FromRow derive macro implementation

use crate::attrs::{named_fields, tagged_fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = tagged_fields(named_fields(&input, "FromRow")?)?;

    let field_extracts = fields.iter().map(|f| {
        let ident = f.ident;
        match f.value_key() {
            Some(column) => quote! { #ident: row.try_get_column(#column)? },
            None => quote! { #ident: ::core::default::Default::default() },
        }
    });

    Ok(quote! {
        impl #impl_generics rowsql::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &rowsql::tokio_postgres::Row) -> rowsql::Result<Self> {
                use rowsql::RowExt;
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
