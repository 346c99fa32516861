use crate::{emit::ident, package::TemplatePackage, render::RenderError};
use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use relgen_schema::naming;

/// Column-name and table-name constants for every entity in the package:
/// a `<Record>Columns` struct of `&'static str` fields, a `TableInfo`, and
/// per-entity consts folded into one aggregate `TABLES`.
pub fn generate(package: &TemplatePackage) -> Result<TokenStream, RenderError> {
    let mut items = quote! {
        /// Table identity shared by every generated table const.
        #[derive(Clone, Copy, Debug)]
        pub struct TableInfo {
            name: &'static str,
            alias: Option<&'static str>,
        }

        impl TableInfo {
            #[must_use]
            pub const fn name(&self) -> &'static str {
                self.name
            }

            #[must_use]
            pub const fn alias(&self) -> Option<&'static str> {
                self.alias
            }
        }
    };

    let mut aggregate_fields = TokenStream::new();
    let mut aggregate_values = TokenStream::new();

    for entity in &package.entities {
        // validate the record ident before deriving the rest from it
        let record = ident(&entity.ident)?;
        let columns_struct = format_ident!("{}Columns", record);
        let table_struct = format_ident!("{}Table", record);
        let table_const = format_ident!("{}", entity.ident.to_case(Case::UpperSnake));
        let field = ident(&naming::field_ident(&entity.ident))?;

        let mut column_fields = TokenStream::new();
        let mut column_values = TokenStream::new();
        for column in &entity.columns {
            let column_ident = ident(&column.ident)?;
            let name = &column.column.name;
            column_fields.extend(quote! { pub #column_ident: &'static str, });
            column_values.extend(quote! { #column_ident: #name, });
        }
        for relation in &entity.relations {
            let relation_ident = ident(&relation.relation.ident)?;
            let name = &relation.relation.ident;
            column_fields.extend(quote! { pub #relation_ident: &'static str, });
            column_values.extend(quote! { #relation_ident: #name, });
        }

        let qualified = entity.entity.qualified_name();
        let alias = if entity.no_alias {
            quote! { None }
        } else {
            let alias = &entity.alias;
            quote! { Some(#alias) }
        };

        items.extend(quote! {
            #[derive(Clone, Copy, Debug)]
            pub struct #columns_struct {
                #column_fields
            }

            #[derive(Clone, Copy, Debug)]
            pub struct #table_struct {
                pub columns: #columns_struct,
                pub table: TableInfo,
            }

            pub const #table_const: #table_struct = #table_struct {
                columns: #columns_struct {
                    #column_values
                },
                table: TableInfo {
                    name: #qualified,
                    alias: #alias,
                },
            };
        });

        aggregate_fields.extend(quote! { pub #field: #table_struct, });
        aggregate_values.extend(quote! { #field: #table_const, });
    }

    items.extend(quote! {
        /// Every generated table, by record name.
        #[derive(Clone, Copy, Debug)]
        pub struct Tables {
            #aggregate_fields
        }

        pub const TABLES: Tables = Tables {
            #aggregate_values
        };
    });

    Ok(items)
}
