use crate::prelude::*;

/// Postgres type names the resolver treats specially.
pub const PG_JSON: &str = "json";
pub const PG_JSONB: &str = "jsonb";
pub const PG_HSTORE: &str = "hstore";
pub const PG_UUID: &str = "uuid";

/// Canonical Rust timestamp type, as rendered in generated code.
pub const TIMESTAMP_TYPE: &str = "DateTime<Utc>";

/// Rendered type for columns that never resolved past the generic fallback.
pub const ANY_TYPE: &str = "serde_json::Value";

///
/// ValueType
///
/// The Rust-side type a column resolved to. `Any` is the generic fallback
/// used when no more specific mapping was found upstream; columns carrying
/// it are generated as ignored fields.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ValueType {
    Path(String),
    Any,
}

impl ValueType {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    #[must_use]
    pub fn is_timestamp(&self) -> bool {
        matches!(self, Self::Path(p) if p == TIMESTAMP_TYPE)
    }

    /// The type path as it appears in generated source.
    #[must_use]
    pub fn rust_type(&self) -> &str {
        match self {
            Self::Path(p) => p,
            Self::Any => ANY_TYPE,
        }
    }
}

/// Map a declared Postgres type to its default Rust value type plus the
/// import identifiers that type needs. Unknown types fall back to `Any`.
#[must_use]
pub fn resolve_db_type(db_type: &str, array: bool) -> (ValueType, &'static [&'static str]) {
    let (base, imports): (&str, &'static [&'static str]) = match db_type {
        "int2" | "smallint" | "smallserial" => ("i16", &[]),
        "int4" | "int" | "integer" | "serial" => ("i32", &[]),
        "int8" | "bigint" | "bigserial" => ("i64", &[]),
        "float4" | "real" => ("f32", &[]),
        "float8" | "double precision" => ("f64", &[]),
        "bool" | "boolean" => ("bool", &[]),
        "text" | "varchar" | "character varying" | "char" | "bpchar" | "character" | "citext"
        | "name" | "inet" | "cidr" | "macaddr" => ("String", &[]),
        "bytea" => ("Vec<u8>", &[]),
        "numeric" | "decimal" => ("Decimal", &["rust_decimal::Decimal"]),
        "uuid" => ("Uuid", &["uuid::Uuid"]),
        "date" => ("NaiveDate", &["chrono::NaiveDate"]),
        "time" | "timetz" => ("NaiveTime", &["chrono::NaiveTime"]),
        "timestamp" | "timestamptz" => (TIMESTAMP_TYPE, &["chrono::DateTime", "chrono::Utc"]),
        "hstore" => ("HashMap<String, String>", &["std::collections::HashMap"]),

        // json columns stay on the fallback until an override names a type
        _ => return (ValueType::Any, &[]),
    };

    let ty = if array {
        ValueType::Path(format!("Vec<{base}>"))
    } else {
        ValueType::path(base)
    };

    (ty, imports)
}
