use crate::{package::TemplatePackage, render::RenderError};
use proc_macro2::TokenStream;
use quote::quote;

/// The filter plumbing every generated search type builds on. Entity
/// independent; rendered once per run when search generation is enabled.
pub fn generate(_package: &TemplatePackage) -> Result<TokenStream, RenderError> {
    Ok(quote! {
        use relq::{QueryBuilder, Value};

        /// Equality condition applied by generated filters.
        pub const CONDITION: &str = "?.? = ?";

        pub type Applier = Box<dyn Fn(QueryBuilder) -> QueryBuilder>;

        /// Accumulates filter appliers before a query runs.
        #[derive(Default)]
        pub struct Search {
            appliers: Vec<Applier>,
        }

        impl Search {
            #[must_use]
            pub fn apply(&self, mut query: QueryBuilder) -> QueryBuilder {
                for applier in &self.appliers {
                    query = applier(query);
                }

                query
            }

            pub fn where_eq(&mut self, table: &'static str, field: &'static str, value: Value) {
                self.with_apply(Box::new(move |query| {
                    query.filter(
                        CONDITION,
                        &[Value::ident(table), Value::ident(field), value.clone()],
                    )
                }));
            }

            pub fn with(&mut self, condition: &'static str, params: Vec<Value>) {
                self.with_apply(Box::new(move |query| query.filter(condition, &params)));
            }

            pub fn with_apply(&mut self, applier: Applier) {
                self.appliers.push(applier);
            }
        }

        /// Implemented by every generated filter.
        pub trait Searcher {
            fn apply(&self, query: QueryBuilder) -> QueryBuilder;

            fn q(&self) -> Applier;
        }
    })
}
