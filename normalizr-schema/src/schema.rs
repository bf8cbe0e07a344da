use crate::{EntityOptions, EntitySchema, IterableSchema, Items, Polymorphic, Selector, UnionSchema};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// A schema descriptor. Dispatch during normalization is a match on this enum.
#[derive(Debug, Clone)]
pub enum Schema {
    Entity(Arc<EntitySchema>),
    Iterable(Arc<IterableSchema>),
    Union(Arc<UnionSchema>),
    Structural(Arc<StructuralSchema>),
}

/// A plain mapping field → child schema with no special behavior.
///
/// Fields of the data without a matching entry are copied unchanged.
#[derive(Debug, Clone, Default)]
pub struct StructuralSchema {
    fields: BTreeMap<String, Schema>,
}

impl StructuralSchema {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Schema> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields.iter().map(|(k, s)| (k.as_str(), s))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Schema {
    /// Shorthand for an entity schema with default options.
    ///
    /// Use [`EntitySchema::new`] directly when relations must be attached
    /// afterwards through the returned `Arc`.
    pub fn entity(key: impl Into<String>) -> Self {
        Self::Entity(EntitySchema::new(key, EntityOptions::default()))
    }

    pub fn entity_with(key: impl Into<String>, options: EntityOptions) -> Self {
        Self::Entity(EntitySchema::new(key, options))
    }

    /// A structural mapping from field names to child schemas.
    pub fn structural<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Self::Structural(Arc::new(StructuralSchema {
            fields: fields.into_iter().map(|(k, s)| (k.into(), s)).collect(),
        }))
    }

    #[must_use]
    pub fn as_entity(&self) -> Option<&Arc<EntitySchema>> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// The entity this schema points at directly or as a homogeneous collection.
    ///
    /// Polymorphic collections and unions have no single target.
    #[must_use]
    pub fn target_entity(&self) -> Option<&Arc<EntitySchema>> {
        match self {
            Self::Entity(entity) => Some(entity),
            Self::Iterable(iterable) => match iterable.items() {
                Items::Single(Schema::Entity(entity)) => Some(entity),
                _ => None,
            },
            _ => None,
        }
    }

    /// Every entity schema reachable from this one, in discovery order.
    ///
    /// Each entity key is reported once, so mutually recursive entities
    /// terminate the walk.
    #[must_use]
    pub fn reachable_entities(&self) -> Vec<Arc<EntitySchema>> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        let mut stack = vec![self.clone()];

        while let Some(schema) = stack.pop() {
            match schema {
                Self::Entity(entity) => {
                    if !seen.insert(entity.key().to_string()) {
                        continue;
                    }
                    // Reverse so relations are explored in field order.
                    for (_, child) in entity.relations().into_iter().rev() {
                        stack.push(child);
                    }
                    found.push(entity);
                }
                Self::Iterable(iterable) => match iterable.items() {
                    Items::Single(item) => stack.push(item.clone()),
                    Items::Polymorphic(poly) => push_members(&mut stack, poly),
                },
                Self::Union(union) => push_members(&mut stack, union.members()),
                Self::Structural(structural) => {
                    let children: Vec<Schema> =
                        structural.fields().map(|(_, s)| s.clone()).collect();
                    stack.extend(children.into_iter().rev());
                }
            }
        }
        found
    }
}

fn push_members(stack: &mut Vec<Schema>, poly: &Polymorphic) {
    let members: Vec<Schema> = poly.schemas().map(|(_, s)| s.clone()).collect();
    stack.extend(members.into_iter().rev());
}

impl From<Arc<EntitySchema>> for Schema {
    fn from(entity: Arc<EntitySchema>) -> Self {
        Self::Entity(entity)
    }
}

impl From<&Arc<EntitySchema>> for Schema {
    fn from(entity: &Arc<EntitySchema>) -> Self {
        Self::Entity(Arc::clone(entity))
    }
}

/// An array of items sharing one schema.
pub fn array_of(item: impl Into<Schema>) -> Schema {
    Schema::Iterable(Arc::new(IterableSchema::new(Items::Single(item.into()))))
}

/// A keyed map of items sharing one schema.
pub fn values_of(item: impl Into<Schema>) -> Schema {
    array_of(item)
}

/// An array whose items choose their schema through `selector`.
pub fn array_of_polymorphic<I, K>(schemas: I, selector: Selector) -> Schema
where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<String>,
{
    Schema::Iterable(Arc::new(IterableSchema::new(Items::Polymorphic(
        Polymorphic::new(schemas, selector),
    ))))
}

/// A keyed map whose values choose their schema through `selector`.
pub fn values_of_polymorphic<I, K>(schemas: I, selector: Selector) -> Schema
where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<String>,
{
    array_of_polymorphic(schemas, selector)
}

/// A single reference whose schema is chosen through `selector`.
pub fn union_of<I, K>(schemas: I, selector: Selector) -> Schema
where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<String>,
{
    Schema::Union(Arc::new(UnionSchema::new(Polymorphic::new(schemas, selector))))
}
