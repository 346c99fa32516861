use convert_case::{Case, Casing};

// Keywords that cannot be used as raw field or type idents in generated code.
const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Derive the record ident for a table name, e.g. `order_items` → `OrderItems`.
#[must_use]
pub fn record_ident(table: &str) -> String {
    safe_ident(table.to_case(Case::Pascal))
}

/// Derive the field ident for a column name, e.g. `CustomerID` → `customer_id`.
#[must_use]
pub fn field_ident(column: &str) -> String {
    safe_ident(column.to_case(Case::Snake))
}

/// Snake-case form used by serialization-name markers.
#[must_use]
pub fn serde_name(column: &str) -> String {
    column.to_case(Case::Snake)
}

/// Association ident for a foreign-key column: the column name with a
/// trailing `_id` stripped, falling back to the target table name.
#[must_use]
pub fn association_ident(fk_column: &str, target_table: &str) -> String {
    let base = fk_column.strip_suffix("_id").unwrap_or(target_table);

    field_ident(base)
}

fn safe_ident(ident: String) -> String {
    if RESERVED.contains(&ident.as_str()) {
        format!("{ident}_")
    } else {
        ident
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_record_and_field_idents() {
        assert_eq!(record_ident("order_items"), "OrderItems");
        assert_eq!(field_ident("CustomerID"), "customer_id");
    }

    #[test]
    fn escapes_reserved_words() {
        assert_eq!(field_ident("type"), "type_");
        assert_eq!(field_ident("move"), "move_");
    }

    #[test]
    fn association_strips_id_suffix() {
        assert_eq!(association_ident("customer_id", "customers"), "customer");
        assert_eq!(association_ident("parent", "categories"), "categories");
    }
}
