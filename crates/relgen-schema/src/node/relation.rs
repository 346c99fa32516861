use crate::prelude::*;

///
/// Relation
///
/// A belongs-to association derived from a foreign-key constraint,
/// attached to the constraint's first column. The target is a qualified
/// name resolved against the schema arena at generation time.
///

#[derive(Clone, Debug, Serialize)]
pub struct Relation {
    /// Qualified name of the referenced table.
    pub target: String,
    /// Constraint columns, in declaration order.
    pub fk_columns: Vec<String>,
    /// Referenced primary-key column, from reader metadata.
    pub target_pk: String,
    /// Association field ident.
    pub ident: String,
}

impl Relation {
    /// Relations keyed by more than one column have no supported join form.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.fk_columns.len() > 1
    }
}
