use normalizr_types::{EntityId, MergeConflict, Record};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Records of one entity type, keyed by id.
pub type EntityTable = BTreeMap<EntityId, Record>;

/// The bag: `entity_key → id → record`.
///
/// Built up by one `normalize` call and handed to the caller. Records are
/// only ever added or extended, never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Entities {
    tables: BTreeMap<String, EntityTable>,
}

impl Entities {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `entity_key`, if any entity of that type was seen.
    #[must_use]
    pub fn table(&self, entity_key: &str) -> Option<&EntityTable> {
        self.tables.get(entity_key)
    }

    #[must_use]
    pub fn get(&self, entity_key: &str, id: &EntityId) -> Option<&Record> {
        self.tables.get(entity_key).and_then(|t| t.get(id))
    }

    pub(crate) fn get_mut(&mut self, entity_key: &str, id: &EntityId) -> Option<&mut Record> {
        self.tables.get_mut(entity_key).and_then(|t| t.get_mut(id))
    }

    /// Ensures the table for `entity_key` exists and returns it.
    pub(crate) fn table_mut(&mut self, entity_key: &str) -> &mut EntityTable {
        self.tables.entry(entity_key.to_string()).or_default()
    }

    pub(crate) fn entry(&mut self, entity_key: &str, id: EntityId) -> Entry<'_, EntityId, Record> {
        self.table_mut(entity_key).entry(id)
    }

    /// Entity keys with at least one record, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityTable)> {
        self.tables.iter().map(|(k, t)| (k.as_str(), t))
    }

    /// Total number of records across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON form: `{entity_key: {id: record}}`.
    ///
    /// Ids become object keys through their `Display` form, which is unique
    /// per canonical id, so no two records share a key.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let tables = self
            .tables
            .iter()
            .map(|(key, table)| {
                let records: Map<String, Value> = table
                    .iter()
                    .map(|(id, record)| (id.to_string(), Value::Object(record.clone())))
                    .collect();
                (key.clone(), Value::Object(records))
            })
            .collect();
        Value::Object(tables)
    }
}

/// Output of a `normalize` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    /// The input shape with entities replaced by ids.
    pub result: Value,
    pub entities: Entities,
    /// Merge conflicts observed during the call, in visit order.
    #[serde(skip)]
    pub conflicts: Vec<MergeConflict>,
}

impl Normalized {
    /// JSON form: `{"result": ..., "entities": ...}`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "result": self.result,
            "entities": self.entities.to_value(),
        })
    }
}
