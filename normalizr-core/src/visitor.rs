//! Recursive schema-driven descent.
//!
//! The visitor pairs every value with its schema, returns the normalized
//! replacement value and writes extracted entities into the bag it owns.
//! One visitor serves exactly one `normalize` call.

use crate::merge::FirstSeenWins;
use crate::options::NormalizeOptions;
use crate::output::Entities;
use normalizr_schema::{
    EntitySchema, IterableSchema, Items, MergeStrategy, Polymorphic, Schema,
};
use normalizr_types::{EntityId, Error, MergeConflict, Record, Result};
use serde_json::{Map, Value, json};
use std::collections::btree_map::Entry;
use tracing::{debug, warn};

pub(crate) struct Visitor<'a> {
    options: &'a NormalizeOptions,
    bag: Entities,
    conflicts: Vec<MergeConflict>,
    depth: usize,
}

impl<'a> Visitor<'a> {
    pub(crate) fn new(options: &'a NormalizeOptions) -> Self {
        Self {
            options,
            bag: Entities::new(),
            conflicts: Vec::new(),
            depth: 0,
        }
    }

    /// Hands over the bag and the conflicts collected so far.
    pub(crate) fn finish(self) -> (Entities, Vec<MergeConflict>) {
        (self.bag, self.conflicts)
    }

    /// Normalizes `value` against `schema`. Scalars are returned unchanged.
    pub(crate) fn dispatch(&mut self, value: &Value, schema: &Schema) -> Result<Value> {
        if !(value.is_object() || value.is_array()) {
            return Ok(value.clone());
        }

        self.enter()?;
        let normalized = match schema {
            Schema::Entity(entity) => self.visit_entity(value, entity),
            Schema::Iterable(iterable) => self.visit_iterable(value, iterable),
            Schema::Union(union) => self.visit_polymorphic(value, union.members()),
            Schema::Structural(structural) => {
                self.visit_structural(value, |field| structural.field(field).cloned())
            }
        };
        self.depth -= 1;
        normalized
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(Error::RecursionLimit {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Walks the value's own keys; fields without a child schema are copied.
    fn visit_structural<F>(&mut self, value: &Value, lookup: F) -> Result<Value>
    where
        F: Fn(&str) -> Option<Schema>,
    {
        match value {
            Value::Object(fields) => {
                let mut output = Map::new();
                for (key, child) in fields {
                    let normalized = match lookup(key) {
                        Some(schema) => self.dispatch(child, &schema)?,
                        None => child.clone(),
                    };
                    self.options.assign_entity.assign(&mut output, key, normalized);
                }
                Ok(Value::Object(output))
            }
            // Positional: the assign strategy only sees object output.
            Value::Array(items) => {
                let mut output = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let normalized = match lookup(&index.to_string()) {
                        Some(schema) => self.dispatch(item, &schema)?,
                        None => item.clone(),
                    };
                    output.push(normalized);
                }
                Ok(Value::Array(output))
            }
            scalar => Ok(scalar.clone()),
        }
    }

    fn visit_iterable(&mut self, value: &Value, iterable: &IterableSchema) -> Result<Value> {
        let items = iterable.items();
        match value {
            Value::Array(elements) => {
                let mut output = Vec::with_capacity(elements.len());
                for element in elements {
                    output.push(self.visit_item(element, items)?);
                }
                Ok(Value::Array(output))
            }
            Value::Object(entries) => {
                let mut output = Map::new();
                for (key, element) in entries {
                    output.insert(key.clone(), self.visit_item(element, items)?);
                }
                Ok(Value::Object(output))
            }
            scalar => Ok(scalar.clone()),
        }
    }

    fn visit_item(&mut self, element: &Value, items: &Items) -> Result<Value> {
        match items {
            Items::Single(schema) => self.dispatch(element, schema),
            Items::Polymorphic(poly) => self.visit_polymorphic(element, poly),
        }
    }

    /// Resolves the concrete schema and tags the result with its key.
    fn visit_polymorphic(&mut self, value: &Value, poly: &Polymorphic) -> Result<Value> {
        let (schema_key, schema) = poly.resolve(value);
        let id = match schema {
            Some(schema) => self.dispatch(value, schema)?,
            None => {
                debug!(schema_key = %schema_key, "No schema registered for polymorphic key, passing value through");
                value.clone()
            }
        };
        Ok(json!({ "id": id, "schema": schema_key }))
    }

    fn visit_entity(&mut self, value: &Value, entity: &EntitySchema) -> Result<Value> {
        let entity_key = entity.key();
        if !value.is_object() {
            return Err(Error::InvalidId {
                entity_key: entity_key.to_string(),
                value: "expected an object, got an array".to_string(),
            });
        }

        let raw_id = entity.id_of(value);
        let id = EntityId::from_value(&raw_id).ok_or_else(|| Error::InvalidId {
            entity_key: entity_key.to_string(),
            value: raw_id.to_string(),
        })?;

        let incoming = match self.visit_structural(value, |field| entity.relation(field))? {
            Value::Object(fields) => fields,
            _ => Record::new(),
        };

        let strategy: &dyn MergeStrategy = entity
            .merge_strategy()
            .or(self.options.merge_into_entity.as_ref())
            .map_or(&FirstSeenWins as &dyn MergeStrategy, |s| s.as_ref());

        let conflicts = match self.bag.entry(entity_key, id.clone()) {
            Entry::Vacant(slot) => {
                let mut record = entity.defaults().clone();
                record.extend(incoming);
                slot.insert(record);
                Vec::new()
            }
            Entry::Occupied(mut slot) => strategy.merge(entity_key, slot.get_mut(), incoming),
        };

        for conflict in conflicts {
            let conflict = MergeConflict::locate(entity_key, &id, conflict);
            warn!(
                entity_key = %conflict.entity_key,
                id = %conflict.id,
                field = %conflict.field,
                existing = %conflict.existing,
                incoming = %conflict.incoming,
                "Found unequal data while merging entity, keeping the earlier value"
            );
            self.conflicts.push(conflict);
        }

        Ok(id.to_value())
    }
}
