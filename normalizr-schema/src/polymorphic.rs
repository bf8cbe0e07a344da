use crate::Schema;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Picks the schema key for one polymorphic value.
#[derive(Clone)]
pub struct Selector(Arc<dyn Fn(&Value) -> String + Send + Sync>);

impl Selector {
    /// Selects by the value of a top-level field.
    ///
    /// Strings are used as-is, other scalars by their JSON text. A missing
    /// field selects the empty key.
    pub fn attribute(name: impl Into<String>) -> Self {
        let name = name.into();
        Self(Arc::new(move |value: &Value| match value.get(&name) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }))
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn select(&self, value: &Value) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector(..)")
    }
}

/// A set of candidate schemas plus the selector that chooses among them.
#[derive(Debug, Clone)]
pub struct Polymorphic {
    schemas: BTreeMap<String, Schema>,
    selector: Selector,
}

impl Polymorphic {
    pub fn new<I, K>(schemas: I, selector: Selector) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Self {
            schemas: schemas.into_iter().map(|(k, s)| (k.into(), s)).collect(),
            selector,
        }
    }

    /// Returns the selected key and its schema (absent for unknown keys).
    #[must_use]
    pub fn resolve(&self, value: &Value) -> (String, Option<&Schema>) {
        let key = self.selector.select(value);
        let schema = self.schemas.get(&key);
        (key, schema)
    }

    pub fn schemas(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas.iter().map(|(k, s)| (k.as_str(), s))
    }

    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

/// What an iterable holds.
#[derive(Debug, Clone)]
pub enum Items {
    /// Every item uses the same schema.
    Single(Schema),
    /// Each item picks its schema through a selector.
    Polymorphic(Polymorphic),
}

/// An array (`array_of`) or keyed map (`values_of`) of items.
///
/// Both constructors produce the same descriptor; the container shape is
/// taken from the data, so either form handles arrays and objects alike.
#[derive(Debug, Clone)]
pub struct IterableSchema {
    items: Items,
}

impl IterableSchema {
    #[must_use]
    pub fn new(items: Items) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &Items {
        &self.items
    }
}

/// A single, non-collection polymorphic reference.
#[derive(Debug, Clone)]
pub struct UnionSchema {
    members: Polymorphic,
}

impl UnionSchema {
    #[must_use]
    pub fn new(members: Polymorphic) -> Self {
        Self { members }
    }

    #[must_use]
    pub fn members(&self) -> &Polymorphic {
        &self.members
    }
}
