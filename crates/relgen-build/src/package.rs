use crate::{
    options::Options,
    tag::{DEFAULT_ALIAS, Marker, Tag},
};
use relgen_schema::{
    naming,
    node::{Column, Entity, Relation, Schema},
    types::{self, ValueType},
};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical ident primary-key columns are renamed to.
pub const ID: &str = "id";

/// Comment attached to columns and relations the generator cannot support.
pub const UNSUPPORTED: &str = "unsupported";

///
/// ResolvedColumn
///
/// A column with every naming, typing, and tagging decision applied.
///

#[derive(Clone, Debug)]
pub struct ResolvedColumn {
    pub column: Column,

    /// Final field ident, after any PK renaming.
    pub ident: String,
    /// Final value type, after custom-type and JSON overrides.
    pub ty: ValueType,

    pub tag: Tag,

    /// Serialization name, present when the serde-tag flag is set.
    pub serde_name: Option<String>,

    pub comment: Option<String>,
}

impl ResolvedColumn {
    fn new(
        entity: &Entity,
        column: &Column,
        options: &Options,
        keep_pk: bool,
        imports: &mut BTreeSet<String>,
    ) -> Self {
        let ident = if column.is_pk && !keep_pk {
            ID.to_string()
        } else {
            column.ident.clone()
        };

        // custom-type substitution, keyed by the declared type
        let mut ty = column.ty.clone();
        if let Some(custom) = options.custom_types.get(&column.db_type) {
            ty = ValueType::path(&custom.rust_type);
            if let Some(import) = &custom.import {
                imports.insert(import.clone());
            }
        }

        // json overrides, most-specific pattern first
        if column.is_json()
            && let Some(override_ty) =
                json_override(&options.json_types, &entity.schema, &entity.table, &column.name)
        {
            ty = ValueType::path(override_ty);
        }

        let mut tag = Tag::new().with(Marker::Name(column.name.clone()));
        let mut comment = None;

        if column.is_pk {
            tag.push(Marker::Pk);
        }

        // storage hints
        if column.db_type == types::PG_HSTORE {
            tag.push(Marker::Hstore);
        } else if column.is_array {
            tag.push(Marker::Array);
        }
        if column.db_type == types::PG_UUID {
            tag.push(Marker::Uuid);
        }

        if !column.nullable && !column.is_pk {
            tag.push(Marker::NullZero);
        }

        if options.soft_delete.as_deref() == Some(column.name.as_str())
            && column.nullable
            && ty.is_timestamp()
            && !column.is_array
        {
            tag.push(Marker::SoftDelete);
        }

        // nothing resolved past the generic fallback: drop the column from
        // the ORM's view instead of failing the run
        if ty.is_any() {
            tag = Tag::ignored();
            comment = Some(UNSUPPORTED.to_string());
        }

        let serde_name = options.serde_tag.then(|| naming::serde_name(&column.name));

        Self {
            column: column.clone(),
            ident,
            ty,
            tag,
            serde_name,
            comment,
        }
    }
}

///
/// ResolvedRelation
///

#[derive(Clone, Debug)]
pub struct ResolvedRelation {
    pub relation: Relation,

    /// Record ident of the target entity.
    pub target_ident: String,

    pub tag: Tag,
    pub serde_name: Option<String>,
    pub comment: Option<String>,
}

impl ResolvedRelation {
    fn new(column: &Column, relation: &Relation, target_ident: String, options: &Options) -> Self {
        // composite keys are emitted for positional stability, but have no
        // supported join form
        let (tag, comment) = if relation.is_composite() {
            (Tag::ignored(), Some(UNSUPPORTED.to_string()))
        } else {
            let tag = Tag::new()
                .with(Marker::Join {
                    column: column.name.clone(),
                    target_pk: relation.target_pk.clone(),
                })
                .with(Marker::BelongsTo);
            (tag, None)
        };

        let serde_name = options.serde_tag.then(|| naming::serde_name(&relation.ident));

        Self {
            relation: relation.clone(),
            target_ident,
            tag,
            serde_name,
            comment,
        }
    }
}

///
/// ResolvedEntity
///

#[derive(Clone, Debug)]
pub struct ResolvedEntity {
    pub entity: Entity,

    pub ident: String,
    pub tag: Tag,
    pub no_alias: bool,
    pub alias: String,

    pub columns: Vec<ResolvedColumn>,
    pub relations: Vec<ResolvedRelation>,

    /// Reader-supplied imports plus any added by custom-type substitution.
    pub imports: Vec<String>,
}

impl ResolvedEntity {
    #[must_use]
    pub fn new(schema: &Schema, entity: &Entity, options: &Options) -> Self {
        // a multi-column primary key always suppresses renaming
        let keep_pk = options.keep_pk || entity.has_multiple_pks();

        let mut imports: BTreeSet<String> = entity.imports.iter().cloned().collect();

        let columns: Vec<ResolvedColumn> = entity
            .columns
            .iter()
            .map(|c| ResolvedColumn::new(entity, c, options, keep_pk, &mut imports))
            .collect();

        // belongs-to relations, from FK columns whose target survived
        // selection; targets filtered out of the run are silently skipped
        let relations: Vec<ResolvedRelation> = entity
            .columns
            .iter()
            .filter(|c| c.is_fk)
            .filter_map(|c| {
                let relation = c.relation.as_ref()?;
                let target = schema.resolve(&relation.target)?;

                Some(ResolvedRelation::new(
                    c,
                    relation,
                    schema.get(target).ident.clone(),
                    options,
                ))
            })
            .collect();

        let mut tag = Tag::new().with(Marker::Table(entity.qualified_name()));
        if !options.no_alias {
            tag.push(Marker::Alias(DEFAULT_ALIAS.to_string()));
        }

        Self {
            entity: entity.clone(),
            ident: entity.ident.clone(),
            tag,
            no_alias: options.no_alias,
            alias: DEFAULT_ALIAS.to_string(),
            columns,
            relations,
            imports: imports.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn has_relations(&self) -> bool {
        !self.relations.is_empty()
    }
}

///
/// TemplatePackage
///
/// The render-ready representation of one generation unit. Built fresh
/// per render target and discarded afterwards.
///

#[derive(Clone, Debug)]
pub struct TemplatePackage {
    pub module: String,

    /// Union of entity imports, deduplicated and lexicographically ordered.
    pub imports: Vec<String>,

    pub entities: Vec<ResolvedEntity>,

    pub with_orm: bool,
    pub with_search: bool,
    pub db_wrap: String,
}

impl TemplatePackage {
    /// Assemble the whole schema into one package.
    #[must_use]
    pub fn new(schema: &Schema, options: &Options) -> Self {
        Self::assemble(schema, schema.entities(), options)
    }

    /// Assemble a single entity, for per-entity artifacts.
    #[must_use]
    pub fn for_entity(schema: &Schema, entity: &Entity, options: &Options) -> Self {
        Self::assemble(schema, std::iter::once(entity), options)
    }

    fn assemble<'a>(
        schema: &Schema,
        entities: impl Iterator<Item = &'a Entity>,
        options: &Options,
    ) -> Self {
        let entities: Vec<ResolvedEntity> = entities
            .map(|e| ResolvedEntity::new(schema, e, options))
            .collect();

        let imports: BTreeSet<String> = entities
            .iter()
            .flat_map(|e| e.imports.iter().cloned())
            .collect();

        Self {
            module: options.module.clone(),
            imports: imports.into_iter().collect(),
            entities,
            with_orm: options.with_orm,
            with_search: options.with_search,
            db_wrap: options.db_wrap.clone(),
        }
    }

    #[must_use]
    pub fn has_imports(&self) -> bool {
        !self.imports.is_empty()
    }
}

// Find the most specific override for a json column. `*` is a literal
// wildcard token; keys use the single canonical `schema.table.field` form.
fn json_override<'a>(
    overrides: &'a BTreeMap<String, String>,
    schema: &str,
    table: &str,
    field: &str,
) -> Option<&'a str> {
    let tiers = [
        format!("{schema}.{table}.{field}"),
        format!("{schema}.*.{field}"),
        format!("{schema}.{table}.*"),
        format!("{schema}.*.*"),
    ];

    tiers
        .iter()
        .find_map(|key| overrides.get(key))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_schema::node::NodeError;

    fn column(name: &str, db_type: &str) -> Column {
        let (ty, _) = types::resolve_db_type(db_type, false);
        Column {
            name: name.to_string(),
            ident: naming::field_ident(name),
            db_type: db_type.to_string(),
            ty,
            nullable: false,
            is_pk: false,
            is_fk: false,
            is_array: false,
            relation: None,
        }
    }

    fn pk(name: &str, db_type: &str) -> Column {
        Column {
            is_pk: true,
            ..column(name, db_type)
        }
    }

    fn entity(table: &str, columns: Vec<Column>) -> Entity {
        Entity {
            schema: "public".to_string(),
            table: table.to_string(),
            ident: naming::record_ident(table),
            columns,
            imports: Vec::new(),
        }
    }

    fn schema_of(entities: Vec<Entity>) -> Result<Schema, NodeError> {
        let mut schema = Schema::new();
        for e in entities {
            schema.insert(e)?;
        }
        Ok(schema)
    }

    fn resolve_single(entity: Entity, options: &Options) -> ResolvedEntity {
        let schema = schema_of(vec![entity]).unwrap();
        ResolvedEntity::new(&schema, schema.entities().next().unwrap(), options)
    }

    #[test]
    fn any_type_collapses_to_ignore_marker() {
        let resolved = resolve_single(
            entity("orders", vec![pk("order_id", "int8"), column("extra", "jsonb")]),
            &Options::default(),
        );

        let extra = &resolved.columns[1];
        assert_eq!(extra.tag.render(), "-");
        assert_eq!(extra.comment.as_deref(), Some(UNSUPPORTED));

        // supported siblings are untouched
        assert_eq!(resolved.columns[0].tag.render(), "order_id,pk");
    }

    #[test]
    fn pk_renames_to_canonical_ident() {
        let resolved = resolve_single(
            entity("orders", vec![pk("order_id", "int8")]),
            &Options::default(),
        );
        assert_eq!(resolved.columns[0].ident, ID);

        let resolved = resolve_single(
            entity("orders", vec![pk("order_id", "int8")]),
            &Options {
                keep_pk: true,
                ..Options::default()
            },
        );
        assert_eq!(resolved.columns[0].ident, "order_id");
    }

    #[test]
    fn multiple_pks_always_keep_their_names() {
        let columns = vec![pk("order_id", "int8"), pk("line_no", "int4")];

        for keep_pk in [false, true] {
            let resolved = resolve_single(
                entity("order_lines", columns.clone()),
                &Options {
                    keep_pk,
                    ..Options::default()
                },
            );
            assert_eq!(resolved.columns[0].ident, "order_id");
            assert_eq!(resolved.columns[1].ident, "line_no");
        }
    }

    #[test]
    fn json_override_precedence() {
        let json_types: BTreeMap<String, String> = [
            ("s.t.f", "A"),
            ("s.*.f", "B"),
            ("s.t.*", "C"),
            ("s.*.*", "D"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for (table, field, expected) in [
            ("t", "f", "A"),
            ("t", "g", "C"),
            ("u", "f", "B"),
            ("u", "g", "D"),
        ] {
            assert_eq!(
                json_override(&json_types, "s", table, field),
                Some(expected),
                "({table}, {field})"
            );
        }

        assert_eq!(json_override(&json_types, "other", "t", "f"), None);
    }

    #[test]
    fn json_override_applies_to_resolved_type() {
        let options = Options {
            json_types: [("public.orders.extra".to_string(), "Payload".to_string())]
                .into_iter()
                .collect(),
            ..Options::default()
        };

        let resolved = resolve_single(entity("orders", vec![column("extra", "jsonb")]), &options);
        let extra = &resolved.columns[0];

        assert_eq!(extra.ty, ValueType::path("Payload"));
        // an overridden json column is a supported column
        assert_eq!(extra.tag.render(), "extra,nullzero");
        assert!(extra.comment.is_none());
    }

    #[test]
    fn custom_type_substitution_records_import() {
        let options = Options {
            custom_types: crate::options::CustomTypeMapping::parse(&[
                "ltree:ltree_types::Ltree".to_string(),
            ])
            .unwrap(),
            ..Options::default()
        };

        let resolved = resolve_single(entity("nodes", vec![column("path", "ltree")]), &options);

        assert_eq!(resolved.columns[0].ty, ValueType::path("Ltree"));
        assert!(resolved.imports.contains(&"ltree_types::Ltree".to_string()));
        // no longer the generic fallback, so no ignore marker
        assert_eq!(resolved.columns[0].tag.render(), "path,nullzero");
    }

    #[test]
    fn soft_delete_requires_all_four_conditions() {
        let options = Options {
            soft_delete: Some("deleted_at".to_string()),
            ..Options::default()
        };

        let base = Column {
            nullable: true,
            ..column("deleted_at", "timestamptz")
        };

        let marked = resolve_single(entity("orders", vec![base.clone()]), &options);
        assert_eq!(marked.columns[0].tag.render(), "deleted_at,soft_delete");

        // flip each condition in turn
        let renamed = Column {
            name: "removed_at".to_string(),
            ..base.clone()
        };
        let non_nullable = Column {
            nullable: false,
            ..base.clone()
        };
        let non_timestamp = Column {
            ty: ValueType::path("i64"),
            ..base.clone()
        };
        let array = Column {
            is_array: true,
            ..base
        };

        for flipped in [renamed, non_nullable, non_timestamp, array] {
            let resolved = resolve_single(entity("orders", vec![flipped]), &options);
            let tag = resolved.columns[0].tag.render();
            assert!(!tag.contains("soft_delete"), "unexpected marker in {tag}");
        }
    }

    #[test]
    fn composite_relation_is_disabled() {
        let mut fk = column("order_id", "int8");
        fk.is_fk = true;
        fk.relation = Some(Relation {
            target: "public.order_lines".to_string(),
            fk_columns: vec!["order_id".to_string(), "line_no".to_string()],
            target_pk: "order_id".to_string(),
            ident: "order_line".to_string(),
        });

        let lines = entity("order_lines", vec![pk("order_id", "int8"), pk("line_no", "int4")]);
        let refs = entity("shipments", vec![fk]);
        let schema = schema_of(vec![lines, refs]).unwrap();

        let shipments = schema.entities().nth(1).unwrap();
        let resolved = ResolvedEntity::new(&schema, shipments, &Options::default());

        // emitted for positional stability, but content-disabled
        assert_eq!(resolved.relations.len(), 1);
        let relation = &resolved.relations[0];
        assert_eq!(relation.tag.render(), "-");
        assert_eq!(relation.comment.as_deref(), Some(UNSUPPORTED));
        assert!(!relation.tag.render().contains("join"));
    }

    #[test]
    fn relation_with_filtered_target_is_skipped() {
        let mut fk = column("customer_id", "int8");
        fk.is_fk = true;
        fk.relation = Some(Relation {
            target: "public.customers".to_string(),
            fk_columns: vec!["customer_id".to_string()],
            target_pk: "id".to_string(),
            ident: "customer".to_string(),
        });

        // customers never made it into the arena
        let resolved = resolve_single(entity("orders", vec![fk]), &Options::default());
        assert!(!resolved.has_relations());
    }

    #[test]
    fn imports_dedupe_and_stay_deterministic() {
        let mut first = entity("orders", vec![column("placed_at", "timestamptz")]);
        first.imports = vec!["chrono::DateTime".to_string(), "chrono::Utc".to_string()];
        let mut second = entity("shipments", vec![column("shipped_at", "timestamptz")]);
        second.imports = vec!["chrono::Utc".to_string(), "chrono::DateTime".to_string()];

        let schema = schema_of(vec![first, second]).unwrap();
        let options = Options::default();

        let once = TemplatePackage::new(&schema, &options);
        let twice = TemplatePackage::new(&schema, &options);

        assert_eq!(once.imports, vec!["chrono::DateTime", "chrono::Utc"]);
        assert_eq!(once.imports, twice.imports);
        assert!(once.has_imports());
    }

    #[test]
    fn entity_tag_carries_alias_unless_suppressed() {
        let resolved = resolve_single(entity("orders", vec![]), &Options::default());
        assert_eq!(resolved.tag.render(), "public.orders,alias:t");

        let resolved = resolve_single(
            entity("orders", vec![]),
            &Options {
                no_alias: true,
                ..Options::default()
            },
        );
        assert_eq!(resolved.tag.render(), "public.orders");
    }

    #[test]
    fn serde_tag_adds_serialization_names() {
        let options = Options {
            serde_tag: true,
            ..Options::default()
        };

        let resolved = resolve_single(entity("orders", vec![pk("OrderID", "int8")]), &options);
        let col = &resolved.columns[0];

        // the pk renamed to `id`, but the serialization name tracks the
        // column, independent of the primary tag
        assert_eq!(col.ident, ID);
        assert_eq!(col.serde_name.as_deref(), Some("order_id"));
        assert_eq!(col.tag.render(), "OrderID,pk");
    }

    #[test]
    fn end_to_end_orders_entity() {
        let mut customer_id = Column {
            nullable: true,
            ..column("customer_id", "int8")
        };
        customer_id.is_fk = true;
        customer_id.relation = Some(Relation {
            target: "public.customers".to_string(),
            fk_columns: vec!["customer_id".to_string()],
            target_pk: "id".to_string(),
            ident: "customer".to_string(),
        });

        let orders = entity(
            "orders",
            vec![
                pk("id", "int8"),
                customer_id,
                column("total", "numeric"),
                column("extra", "jsonb"),
            ],
        );
        let customers = entity("customers", vec![pk("id", "int8")]);

        let schema = schema_of(vec![customers, orders]).unwrap();
        let package = TemplatePackage::new(&schema, &Options::default());

        let orders = &package.entities[1];
        assert_eq!(orders.tag.render(), "public.orders,alias:t");

        let [id, customer_id, total, extra] = orders.columns.as_slice() else {
            panic!("expected four columns");
        };

        assert_eq!(id.ident, ID);
        assert_eq!(id.tag.render(), "id,pk");

        assert_eq!(customer_id.ident, "customer_id");
        assert_eq!(customer_id.tag.render(), "customer_id");

        assert_eq!(total.tag.render(), "total,nullzero");
        assert_eq!(total.ty, ValueType::path("Decimal"));

        assert_eq!(extra.tag.render(), "-");
        assert_eq!(extra.comment.as_deref(), Some(UNSUPPORTED));

        let relation = &orders.relations[0];
        assert_eq!(relation.tag.render(), "join:customer_id=id,rel:belongs-to");
        assert_eq!(relation.target_ident, "Customers");
    }
}
