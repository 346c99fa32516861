pub mod model;
pub mod orm;
pub mod search;
pub mod tables;

use crate::{package::ResolvedColumn, render::RenderError};
use proc_macro2::TokenStream;
use quote::quote;

// Parse a field or type ident, surfacing bad names as render errors
// instead of panicking inside quote.
pub(crate) fn ident(name: &str) -> Result<syn::Ident, RenderError> {
    syn::parse_str(name).map_err(|_| RenderError::Ident(name.to_string()))
}

pub(crate) fn parse_type(ty: &str) -> Result<syn::Type, RenderError> {
    syn::parse_str(ty).map_err(|_| RenderError::Type(ty.to_string()))
}

// The rendered field type: nullable columns wrap in Option.
pub(crate) fn column_type(column: &ResolvedColumn) -> Result<syn::Type, RenderError> {
    let base = column.ty.rust_type();
    let full = if column.column.nullable {
        format!("Option<{base}>")
    } else {
        base.to_string()
    };

    parse_type(&full)
}

// `use` items for the package's deduplicated import list.
pub(crate) fn use_items(imports: &[String]) -> Result<TokenStream, RenderError> {
    let mut items = TokenStream::new();
    for import in imports {
        let path: syn::Path =
            syn::parse_str(import).map_err(|_| RenderError::Import(import.clone()))?;
        items.extend(quote! { use #path; });
    }

    Ok(items)
}
