use crate::{prelude::*, types};

///
/// Column
///

#[derive(Clone, Debug, Serialize)]
pub struct Column {
    /// Column name as declared in the database.
    pub name: String,
    /// Rust field ident derived from the column name.
    pub ident: String,
    /// Declared Postgres type, e.g. `timestamptz`.
    pub db_type: String,

    pub ty: ValueType,

    pub nullable: bool,
    pub is_pk: bool,
    pub is_fk: bool,
    pub is_array: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

impl Column {
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.db_type == types::PG_JSON || self.db_type == types::PG_JSONB
    }
}
