use indexmap::IndexMap;
use serde::Serialize;

/// Mapping rules of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMapping {
    pub entity: String,
    pub table: Option<String>,
    pub keys: Vec<String>,
    pub properties: Vec<String>,
}

impl EntityMapping {
    fn new(entity: String) -> Self {
        Self {
            entity,
            table: None,
            keys: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Table name, defaulting to the entity's simple name.
    pub fn table_name(&self) -> &str {
        match &self.table {
            Some(table) => table,
            None => self.entity.rsplit('.').next().unwrap_or(&self.entity),
        }
    }
}

/// Mutable model-building context for one store context.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelBuilder {
    store_context: String,
    entities: IndexMap<String, EntityMapping>,
}

impl ModelBuilder {
    pub fn new(store_context: impl Into<String>) -> Self {
        Self {
            store_context: store_context.into(),
            entities: IndexMap::new(),
        }
    }

    pub fn store_context(&self) -> &str {
        &self.store_context
    }

    /// Starts (or continues) the mapping of `entity`.
    pub fn entity(&mut self, entity: impl Into<String>) -> EntityMappingBuilder<'_> {
        let entity = entity.into();
        let mapping = self
            .entities
            .entry(entity.clone())
            .or_insert_with(|| EntityMapping::new(entity));
        EntityMappingBuilder { mapping }
    }

    pub fn get(&self, entity: &str) -> Option<&EntityMapping> {
        self.entities.get(entity)
    }

    pub fn mappings(&self) -> impl Iterator<Item = &EntityMapping> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

pub struct EntityMappingBuilder<'a> {
    mapping: &'a mut EntityMapping,
}

impl EntityMappingBuilder<'_> {
    pub fn to_table(self, table: impl Into<String>) -> Self {
        self.mapping.table = Some(table.into());
        self
    }

    pub fn has_key(self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.mapping.keys.contains(&column) {
            self.mapping.keys.push(column);
        }
        self
    }

    pub fn property(self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.mapping.properties.contains(&name) {
            self.mapping.properties.push(name);
        }
        self
    }
}
