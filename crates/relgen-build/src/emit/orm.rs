use crate::{emit::ident, package::TemplatePackage, render::RenderError};
use proc_macro2::TokenStream;
use quote::quote;

/// The wrapper struct select helpers hang off. The name comes from
/// configuration, so it is the one place an emitter can meet a bad ident
/// supplied directly by the user.
pub fn generate(package: &TemplatePackage) -> Result<TokenStream, RenderError> {
    let wrapper = ident(&package.db_wrap)?;

    Ok(quote! {
        use relq::Db;

        /// Thin wrapper around the database connection.
        pub struct #wrapper {
            pub db: Db,
        }

        impl #wrapper {
            #[must_use]
            pub const fn new(db: Db) -> Self {
                Self { db }
            }
        }
    })
}
