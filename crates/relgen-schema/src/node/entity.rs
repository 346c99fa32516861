use crate::prelude::*;

///
/// Entity
///
/// One record type corresponding to one table or view. `imports` holds the
/// identifiers the resolved column types need, as supplied by the reader;
/// the assembler later unions and orders them.
///

#[derive(Clone, Debug, Serialize)]
pub struct Entity {
    pub schema: String,
    pub table: String,
    pub ident: String,

    pub columns: Vec<Column>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
}

impl Entity {
    /// Schema-qualified table name, e.g. `public.orders`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    #[must_use]
    pub fn has_multiple_pks(&self) -> bool {
        self.columns.iter().filter(|c| c.is_pk).count() > 1
    }
}
