use crate::{
    emit::{column_type, ident, parse_type, use_items},
    package::{ResolvedColumn, ResolvedEntity, ResolvedRelation, TemplatePackage},
    render::RenderError,
};
use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Record structs for every entity in the package, plus select helpers on
/// the wrapper struct when ORM queries are enabled.
pub fn generate(package: &TemplatePackage) -> Result<TokenStream, RenderError> {
    let uses = use_items(&package.imports)?;

    let mut records = TokenStream::new();
    for entity in &package.entities {
        records.extend(record_struct(entity)?);
    }

    let mut selects = TokenStream::new();
    if package.with_orm {
        for entity in &package.entities {
            selects.extend(select_impl(package, entity)?);
        }
    }

    Ok(quote! {
        use relq::Model;
        use serde::{Deserialize, Serialize};
        #uses

        #records
        #selects
    })
}

fn record_struct(entity: &ResolvedEntity) -> Result<TokenStream, RenderError> {
    let record = ident(&entity.ident)?;
    let tag = entity.tag.render();

    let mut fields = TokenStream::new();
    for column in &entity.columns {
        fields.extend(column_field(column)?);
    }
    for relation in &entity.relations {
        fields.extend(relation_field(relation)?);
    }

    Ok(quote! {
        #[derive(Clone, Debug, Deserialize, Model, Serialize)]
        #[relq(#tag)]
        pub struct #record {
            #fields
        }
    })
}

fn column_field(column: &ResolvedColumn) -> Result<TokenStream, RenderError> {
    let field = ident(&column.ident)?;
    let ty = column_type(column)?;
    let tag = column.tag.render();

    let doc = column.comment.as_ref().map(|comment| quote! { #[doc = #comment] });
    let serde = column
        .serde_name
        .as_ref()
        .map(|name| quote! { #[serde(rename = #name)] });

    Ok(quote! {
        #doc
        #[relq(#tag)]
        #serde
        pub #field: #ty,
    })
}

fn relation_field(relation: &ResolvedRelation) -> Result<TokenStream, RenderError> {
    let field = ident(&relation.relation.ident)?;
    let target = parse_type(&format!("Option<Box<{}>>", relation.target_ident))?;
    let tag = relation.tag.render();

    let doc = relation.comment.as_ref().map(|comment| quote! { #[doc = #comment] });
    let serde = relation
        .serde_name
        .as_ref()
        .map(|name| quote! { #[serde(rename = #name)] });

    // boxed so self- and mutually-referencing schemas stay representable
    Ok(quote! {
        #doc
        #[relq(#tag)]
        #serde
        pub #field: #target,
    })
}

fn select_impl(
    package: &TemplatePackage,
    entity: &ResolvedEntity,
) -> Result<TokenStream, RenderError> {
    let wrapper = ident(&package.db_wrap)?;
    let record = ident(&entity.ident)?;
    let method = format_ident!("select_{}", entity.ident.to_case(Case::Snake));

    let columns = entity.columns.iter().map(|column| {
        let name = &column.column.name;
        if entity.no_alias {
            name.clone()
        } else {
            format!("{}.{}", entity.alias, name)
        }
    });

    Ok(quote! {
        impl #wrapper {
            pub fn #method(&self) -> relq::Result<Vec<#record>> {
                self.db
                    .query::<#record>()
                    #(.column(#columns))*
                    .all()
            }
        }
    })
}
