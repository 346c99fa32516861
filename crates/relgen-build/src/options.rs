use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Default name for the ORM wrapper struct.
pub const DEFAULT_DB_WRAP: &str = "DbWrap";

///
/// OptionsError
///
/// Configuration parse failures. Always fatal, and always reported before
/// any snapshot access.
///

#[derive(Debug, ThisError)]
pub enum OptionsError {
    #[error("malformed custom type '{0}': expected '<pg_type>:<rust_path>'")]
    CustomType(String),

    #[error("malformed json override '{0}': expected '<schema>.<table>.<field>=<type>'")]
    JsonOverride(String),
}

///
/// Options
///
/// Generation options, threaded as an immutable value into every
/// resolution call. Never mutated after the CLI assembles it.
///

#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Logical module name carried into generated-file headers.
    pub module: String,

    /// Keep primary-key column names instead of renaming to `id`.
    pub keep_pk: bool,

    /// Column name carrying the soft-delete timestamp.
    pub soft_delete: Option<String>,

    /// Suppress the `alias:t` entity marker.
    pub no_alias: bool,

    /// Pass-through for the discard-unknown-columns marker; the engine
    /// itself never reads it (the runtime handles discards globally).
    pub no_discard: bool,

    /// Add `#[serde(rename = "…")]` markers to generated fields.
    pub serde_tag: bool,

    pub with_orm: bool,
    pub with_search: bool,

    /// Name of the wrapper struct for ORM queries.
    pub db_wrap: String,

    pub custom_types: CustomTypeMapping,

    /// JSON-column overrides keyed by `schema.table.field` patterns.
    pub json_types: BTreeMap<String, String>,
}

impl Options {
    /// Fill unset fields with their defaults.
    pub fn def(&mut self) {
        if self.db_wrap.trim().is_empty() {
            self.db_wrap = DEFAULT_DB_WRAP.to_string();
        }
    }

    /// Parse `schema.table.field=Type` override specs.
    pub fn parse_json_overrides(
        specs: &[String],
    ) -> Result<BTreeMap<String, String>, OptionsError> {
        let mut overrides = BTreeMap::new();
        for spec in specs {
            let (pattern, ty) = spec
                .split_once('=')
                .ok_or_else(|| OptionsError::JsonOverride(spec.clone()))?;

            if ty.is_empty() || pattern.split('.').count() != 3 {
                return Err(OptionsError::JsonOverride(spec.clone()));
            }
            if pattern.split('.').any(str::is_empty) {
                return Err(OptionsError::JsonOverride(spec.clone()));
            }

            overrides.insert(pattern.to_string(), ty.to_string());
        }

        Ok(overrides)
    }
}

///
/// CustomType
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustomType {
    /// Type name as rendered in generated fields.
    pub rust_type: String,

    /// Import identifier the type needs, when it is not self-contained.
    pub import: Option<String>,
}

///
/// CustomTypeMapping
///
/// Declared Postgres type → replacement Rust type. Specs look like
/// `uuid:uuid::Uuid` (imports `uuid::Uuid`, renders `Uuid`) or
/// `bytea:String` (no import).
///

#[derive(Clone, Debug, Default)]
pub struct CustomTypeMapping(BTreeMap<String, CustomType>);

impl CustomTypeMapping {
    pub fn parse(specs: &[String]) -> Result<Self, OptionsError> {
        let mut mapping = Self::default();
        for spec in specs {
            let (db_type, path) = spec
                .split_once(':')
                .ok_or_else(|| OptionsError::CustomType(spec.clone()))?;

            if db_type.is_empty() || path.is_empty() {
                return Err(OptionsError::CustomType(spec.clone()));
            }

            let custom = match path.rsplit_once("::") {
                Some((_, ty)) if ty.is_empty() => {
                    return Err(OptionsError::CustomType(spec.clone()));
                }
                Some((_, ty)) => CustomType {
                    rust_type: ty.to_string(),
                    import: Some(path.to_string()),
                },
                None => CustomType {
                    rust_type: path.to_string(),
                    import: None,
                },
            };

            mapping.insert(db_type, custom);
        }

        Ok(mapping)
    }

    pub fn insert(&mut self, db_type: &str, custom: CustomType) {
        self.0.insert(db_type.to_string(), custom);
    }

    #[must_use]
    pub fn get(&self, db_type: &str) -> Option<&CustomType> {
        self.0.get(db_type)
    }

    #[must_use]
    pub fn has(&self, db_type: &str) -> bool {
        self.0.contains_key(db_type)
    }
}
