//! Declarative schema documents.
//!
//! A document lists entity types by key, their id rule, defaults and
//! relations, plus the root schema to normalize with:
//!
//! ```json
//! {
//!   "entities": {
//!     "articles": {
//!       "defaults": {"votes": 0},
//!       "relations": {"author": {"entity": "users"}}
//!     },
//!     "users": {"id_attribute": "uid"}
//!   },
//!   "root": {"array_of": {"entity": "articles"}}
//! }
//! ```
//!
//! Entities are created before any relation is attached, so documents may
//! describe mutually recursive types.

use crate::{
    EntityOptions, EntitySchema, Schema, Selector, array_of, array_of_polymorphic, union_of,
    values_of, values_of_polymorphic,
};
use normalizr_types::{Error, Record, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A reference to a schema inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaNode {
    /// An entity declared under `entities`.
    Entity(String),
    ArrayOf(Box<SchemaNode>),
    ValuesOf(Box<SchemaNode>),
    ArrayOfPolymorphic(PolymorphicNode),
    ValuesOfPolymorphic(PolymorphicNode),
    UnionOf(PolymorphicNode),
    /// A structural field → schema mapping.
    Object(BTreeMap<String, SchemaNode>),
}

/// Candidates of a polymorphic node, chosen by a field of each value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolymorphicNode {
    pub schemas: BTreeMap<String, SchemaNode>,
    pub schema_attribute: String,
}

/// One entity type in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,
    #[serde(default)]
    pub defaults: Record,
    #[serde(default)]
    pub relations: BTreeMap<String, SchemaNode>,
}

fn default_id_attribute() -> String {
    "id".to_string()
}

/// A complete schema definition: entity types plus the root schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub entities: BTreeMap<String, EntityDocument>,
    pub root: SchemaNode,
}

impl SchemaDocument {
    /// Parses a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Parses a document from a JSON value.
    ///
    /// The document and its root must be JSON objects; an array in either
    /// position is rejected as `InvalidSchema`.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                if let Some(Value::Array(_)) = map.get("root") {
                    return Err(Error::InvalidSchema(
                        "root schema must be an object, not an array".into(),
                    ));
                }
            }
            Value::Array(_) => {
                return Err(Error::InvalidSchema(
                    "schema must be an object, not an array".into(),
                ));
            }
            other => {
                return Err(Error::InvalidSchema(format!(
                    "schema must be an object, got {other}"
                )));
            }
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Builds the root [`Schema`].
    pub fn build(&self) -> Result<Schema> {
        let entities: BTreeMap<&str, Arc<EntitySchema>> = self
            .entities
            .iter()
            .map(|(key, doc)| {
                let options = EntityOptions::default()
                    .with_id_field(doc.id_attribute.clone())
                    .with_defaults(Value::Object(doc.defaults.clone()));
                (key.as_str(), EntitySchema::new(key.clone(), options))
            })
            .collect();

        for (key, doc) in &self.entities {
            let entity = &entities[key.as_str()];
            for (field, node) in &doc.relations {
                entity.define(field.clone(), resolve(node, &entities)?);
            }
        }

        resolve(&self.root, &entities)
    }
}

fn resolve(node: &SchemaNode, entities: &BTreeMap<&str, Arc<EntitySchema>>) -> Result<Schema> {
    Ok(match node {
        SchemaNode::Entity(key) => entities
            .get(key.as_str())
            .map(|e| e.to_schema())
            .ok_or_else(|| Error::InvalidSchema(format!("unknown entity '{key}'")))?,
        SchemaNode::ArrayOf(item) => array_of(resolve(item, entities)?),
        SchemaNode::ValuesOf(item) => values_of(resolve(item, entities)?),
        SchemaNode::ArrayOfPolymorphic(poly) => {
            let (schemas, selector) = resolve_polymorphic(poly, entities)?;
            array_of_polymorphic(schemas, selector)
        }
        SchemaNode::ValuesOfPolymorphic(poly) => {
            let (schemas, selector) = resolve_polymorphic(poly, entities)?;
            values_of_polymorphic(schemas, selector)
        }
        SchemaNode::UnionOf(poly) => {
            let (schemas, selector) = resolve_polymorphic(poly, entities)?;
            union_of(schemas, selector)
        }
        SchemaNode::Object(fields) => {
            let mut resolved = Vec::with_capacity(fields.len());
            for (field, child) in fields {
                resolved.push((field.clone(), resolve(child, entities)?));
            }
            Schema::structural(resolved)
        }
    })
}

fn resolve_polymorphic(
    poly: &PolymorphicNode,
    entities: &BTreeMap<&str, Arc<EntitySchema>>,
) -> Result<(Vec<(String, Schema)>, Selector)> {
    let mut schemas = Vec::with_capacity(poly.schemas.len());
    for (key, child) in &poly.schemas {
        schemas.push((key.clone(), resolve(child, entities)?));
    }
    Ok((schemas, Selector::attribute(poly.schema_attribute.clone())))
}
