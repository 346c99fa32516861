use crate::{
    naming,
    node::{Column, Entity, NodeError, Relation, Schema},
    types,
};
use serde::Deserialize;
use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    path::Path,
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// ReadError
///
/// Everything that can go wrong between the snapshot file and a usable
/// schema arena. All of these abort the run before any generation starts.
///

#[derive(Debug, ThisError)]
pub enum ReadError {
    #[error("cannot read snapshot '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed table pattern '{0}': expected 'schema.table' or 'schema.*'")]
    Pattern(String),

    #[error("duplicate table '{0}' in snapshot")]
    DuplicateTable(String),

    #[error("table '{table}': foreign key references unknown table '{target}'")]
    UnknownTarget { table: String, target: String },

    #[error("table '{table}': malformed foreign key: {reason}")]
    ForeignKey { table: String, reason: String },
}

impl From<NodeError> for ReadError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::DuplicateEntity(name) => Self::DuplicateTable(name),
        }
    }
}

///
/// TablePattern
///
/// A `schema.table` selector; `*` in the table position matches every
/// table in the schema. A bare name selects from `public`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TablePattern {
    pub schema: String,
    pub table: String,
}

pub const DEFAULT_SCHEMA: &str = "public";
pub const WILDCARD: &str = "*";

impl TablePattern {
    #[must_use]
    pub fn matches(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && (self.table == WILDCARD || self.table == table)
    }
}

impl FromStr for TablePattern {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (schema, table) = match s.split_once('.') {
            Some((schema, table)) => (schema, table),
            None => (DEFAULT_SCHEMA, s),
        };

        if schema.is_empty() || table.is_empty() || schema == WILDCARD || table.contains('.') {
            return Err(ReadError::Pattern(s.to_string()));
        }

        Ok(Self {
            schema: schema.to_string(),
            table: table.to_string(),
        })
    }
}

impl fmt::Display for TablePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

///
/// Snapshot
///
/// The introspected-schema file format. Produced by an external
/// introspection step; everything here is declarative data.
///

#[derive(Clone, Debug, Deserialize)]
pub struct Snapshot {
    pub tables: Vec<SnapshotTable>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SnapshotTable {
    pub schema: String,
    pub name: String,
    pub columns: Vec<SnapshotColumn>,

    #[serde(default)]
    pub foreign_keys: Vec<SnapshotForeignKey>,
}

impl SnapshotTable {
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SnapshotColumn {
    pub name: String,

    #[serde(rename = "type")]
    pub db_type: String,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default)]
    pub array: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SnapshotForeignKey {
    /// Constraint columns, in declaration order.
    pub columns: Vec<String>,
    /// Qualified name of the referenced table.
    pub references: String,
    /// Referenced columns, matching `columns` positionally.
    pub referenced_columns: Vec<String>,
}

impl Snapshot {
    pub fn from_path(path: &Path) -> Result<Self, ReadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ReadError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.validate()?;

        Ok(snapshot)
    }

    // Every relation target must exist somewhere in the snapshot; a target
    // merely excluded by selection is handled later, not here.
    fn validate(&self) -> Result<(), ReadError> {
        let mut names = BTreeSet::new();
        for table in &self.tables {
            if !names.insert(table.qualified_name()) {
                return Err(ReadError::DuplicateTable(table.qualified_name()));
            }
        }

        for table in &self.tables {
            for fk in &table.foreign_keys {
                if fk.columns.is_empty() {
                    return Err(ReadError::ForeignKey {
                        table: table.qualified_name(),
                        reason: "no columns".to_string(),
                    });
                }
                if fk.referenced_columns.len() != fk.columns.len() {
                    return Err(ReadError::ForeignKey {
                        table: table.qualified_name(),
                        reason: format!(
                            "{} columns reference {} columns",
                            fk.columns.len(),
                            fk.referenced_columns.len()
                        ),
                    });
                }
                for column in &fk.columns {
                    if !table.columns.iter().any(|c| &c.name == column) {
                        return Err(ReadError::ForeignKey {
                            table: table.qualified_name(),
                            reason: format!("unknown column '{column}'"),
                        });
                    }
                }
                if !names.contains(&fk.references) {
                    return Err(ReadError::UnknownTarget {
                        table: table.qualified_name(),
                        target: fk.references.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Select tables by pattern and build the schema arena. With
    /// `follow_fks`, the selection expands to referenced tables whose
    /// schema is itself named by a pattern, iterated to fixpoint.
    pub fn select(&self, patterns: &[TablePattern], follow_fks: bool) -> Result<Schema, ReadError> {
        let by_name: HashMap<String, &SnapshotTable> = self
            .tables
            .iter()
            .map(|t| (t.qualified_name(), t))
            .collect();

        let mut selected: Vec<&SnapshotTable> = self
            .tables
            .iter()
            .filter(|t| patterns.iter().any(|p| p.matches(&t.schema, &t.name)))
            .collect();

        if follow_fks {
            let schemas: BTreeSet<&str> = patterns.iter().map(|p| p.schema.as_str()).collect();
            let mut known: BTreeSet<String> =
                selected.iter().map(|t| t.qualified_name()).collect();

            let mut index = 0;
            while index < selected.len() {
                for fk in &selected[index].foreign_keys {
                    if known.contains(&fk.references) {
                        continue;
                    }
                    let Some(target) = by_name.get(&fk.references) else {
                        continue;
                    };
                    // referenced tables outside the requested schemas stay out
                    if schemas.contains(target.schema.as_str()) {
                        known.insert(fk.references.clone());
                        selected.push(target);
                    }
                }
                index += 1;
            }
        }

        let mut schema = Schema::new();
        for table in selected {
            schema.insert(build_entity(table))?;
        }

        Ok(schema)
    }
}

fn build_entity(table: &SnapshotTable) -> Entity {
    let mut imports = BTreeSet::new();
    let mut columns: Vec<Column> = table
        .columns
        .iter()
        .map(|c| {
            let (ty, needed) = types::resolve_db_type(&c.db_type, c.array);
            imports.extend(needed.iter().map(ToString::to_string));

            Column {
                name: c.name.clone(),
                ident: naming::field_ident(&c.name),
                db_type: c.db_type.clone(),
                ty,
                nullable: c.nullable,
                is_pk: c.primary_key,
                is_fk: false,
                is_array: c.array,
                relation: None,
            }
        })
        .collect();

    for fk in &table.foreign_keys {
        for name in &fk.columns {
            if let Some(column) = columns.iter_mut().find(|c| &c.name == name) {
                column.is_fk = true;
            }
        }

        // the association hangs off the constraint's first column
        let first = &fk.columns[0];
        let (_, target_table) = fk
            .references
            .split_once('.')
            .unwrap_or(("", fk.references.as_str()));
        if let Some(column) = columns.iter_mut().find(|c| &c.name == first) {
            column.relation = Some(Relation {
                target: fk.references.clone(),
                fk_columns: fk.columns.clone(),
                target_pk: fk.referenced_columns[0].clone(),
                ident: naming::association_ident(first, target_table),
            });
        }
    }

    Entity {
        schema: table.schema.clone(),
        table: table.name.clone(),
        ident: naming::record_ident(&table.name),
        columns,
        imports: imports.into_iter().collect(),
    }
}
