use crate::{MergeStrategy, Schema};
use normalizr_types::Record;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// How an entity's id is read from its raw value.
#[derive(Clone)]
pub enum IdAttribute {
    /// Read a top-level field (default: `"id"`).
    Field(String),
    /// Compute the id from the whole raw entity.
    Compute(Arc<dyn Fn(&Value) -> Value + Send + Sync>),
}

impl IdAttribute {
    /// Shorthand for a computed id.
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::Compute(Arc::new(f))
    }

    /// Returns the raw id value; `Null` when the field is missing.
    #[must_use]
    pub fn extract(&self, entity: &Value) -> Value {
        match self {
            Self::Field(name) => entity.get(name).cloned().unwrap_or(Value::Null),
            Self::Compute(f) => f(entity),
        }
    }
}

impl Default for IdAttribute {
    fn default() -> Self {
        Self::Field("id".to_string())
    }
}

impl fmt::Debug for IdAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// Construction options for an [`EntitySchema`].
#[derive(Clone, Default)]
pub struct EntityOptions {
    pub id_attribute: IdAttribute,
    /// Template copied into every new record before its first visit.
    pub defaults: Record,
    /// Overrides the call-level merge strategy for this entity type.
    pub merge_strategy: Option<Arc<dyn MergeStrategy>>,
}

impl EntityOptions {
    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_attribute = IdAttribute::Field(field.into());
        self
    }

    #[must_use]
    pub fn with_id_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.id_attribute = IdAttribute::compute(f);
        self
    }

    /// Sets the defaults template. Non-object values are ignored.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        if let Value::Object(map) = defaults {
            self.defaults = map;
        }
        self
    }

    #[must_use]
    pub fn with_merge_strategy(mut self, strategy: Arc<dyn MergeStrategy>) -> Self {
        self.merge_strategy = Some(strategy);
        self
    }
}

/// An entity type: records of this type are pulled out of the tree into
/// `entities[key][id]` and replaced in place by their id.
///
/// Relation fields are attached after construction with [`define`](Self::define),
/// which is what lets two entity types refer to each other. Definitions are
/// expected to be complete before the schema is used; they are read, never
/// written, during normalization.
///
/// Mutually referencing entity schemas form an `Arc` cycle and are never
/// freed. Schemas are meant to be built once per process.
pub struct EntitySchema {
    key: String,
    id_attribute: IdAttribute,
    defaults: Record,
    merge_strategy: Option<Arc<dyn MergeStrategy>>,
    relations: RwLock<BTreeMap<String, Schema>>,
}

impl EntitySchema {
    /// Creates an entity schema stored under `key`.
    pub fn new(key: impl Into<String>, options: EntityOptions) -> Arc<Self> {
        Arc::new(Self {
            key: key.into(),
            id_attribute: options.id_attribute,
            defaults: options.defaults,
            merge_strategy: options.merge_strategy,
            relations: RwLock::new(BTreeMap::new()),
        })
    }

    /// Wraps this entity as a [`Schema`].
    #[must_use]
    pub fn to_schema(self: &Arc<Self>) -> Schema {
        Schema::Entity(Arc::clone(self))
    }

    /// The entity key (table name) in the output.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn id_attribute(&self) -> &IdAttribute {
        &self.id_attribute
    }

    /// Raw id of `entity` according to the id rule.
    #[must_use]
    pub fn id_of(&self, entity: &Value) -> Value {
        self.id_attribute.extract(entity)
    }

    /// The shared defaults template. Callers must clone it per record.
    #[must_use]
    pub fn defaults(&self) -> &Record {
        &self.defaults
    }

    #[must_use]
    pub fn merge_strategy(&self) -> Option<&Arc<dyn MergeStrategy>> {
        self.merge_strategy.as_ref()
    }

    /// Declares a relation: values under `field` are normalized with `schema`.
    /// Redefining a field replaces the previous schema.
    pub fn define(&self, field: impl Into<String>, schema: Schema) {
        self.relations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field.into(), schema);
    }

    /// The child schema declared for `field`, if any.
    #[must_use]
    pub fn relation(&self, field: &str) -> Option<Schema> {
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(field)
            .cloned()
    }

    #[must_use]
    pub fn has_relation(&self, field: &str) -> bool {
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(field)
    }

    /// Snapshot of all relations, ordered by field name.
    #[must_use]
    pub fn relations(&self) -> Vec<(String, Schema)> {
        self.relations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl fmt::Debug for EntitySchema {
    // Relations are printed by name only; entity graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.relations().into_iter().map(|(k, _)| k).collect();
        f.debug_struct("EntitySchema")
            .field("key", &self.key)
            .field("id_attribute", &self.id_attribute)
            .field("defaults", &self.defaults)
            .field("relations", &fields)
            .finish_non_exhaustive()
    }
}
