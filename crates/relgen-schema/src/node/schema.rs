use crate::{
    node::{Entity, NodeError},
    prelude::*,
};
use std::collections::BTreeMap;

///
/// EntityId
///
/// Index into the schema arena. Relation targets are expressed as lookups
/// keyed by qualified name rather than owned references, so self- and
/// mutually-referencing tables never form ownership cycles.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub struct EntityId(usize);

///
/// Schema
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Schema {
    entities: Vec<Entity>,
    lookup: BTreeMap<String, EntityId>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, keyed by its qualified name.
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId, NodeError> {
        let key = entity.qualified_name();
        if self.lookup.contains_key(&key) {
            return Err(NodeError::DuplicateEntity(key));
        }

        let id = EntityId(self.entities.len());
        self.entities.push(entity);
        self.lookup.insert(key, id);

        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    /// Resolve a qualified name (`schema.table`) to an arena id.
    #[must_use]
    pub fn resolve(&self, qualified: &str) -> Option<EntityId> {
        self.lookup.get(qualified).copied()
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(schema: &str, table: &str) -> Entity {
        Entity {
            schema: schema.to_string(),
            table: table.to_string(),
            ident: crate::naming::record_ident(table),
            columns: Vec::new(),
            imports: Vec::new(),
        }
    }

    #[test]
    fn resolves_by_qualified_name() {
        let mut schema = Schema::new();
        let id = schema.insert(entity("public", "orders")).unwrap();

        assert_eq!(schema.resolve("public.orders"), Some(id));
        assert_eq!(schema.resolve("public.customers"), None);
        assert_eq!(schema.get(id).ident, "Orders");
    }

    #[test]
    fn rejects_duplicate_qualified_names() {
        let mut schema = Schema::new();
        schema.insert(entity("public", "orders")).unwrap();

        assert!(matches!(
            schema.insert(entity("public", "orders")),
            Err(NodeError::DuplicateEntity(name)) if name == "public.orders"
        ));
    }
}
