//! Schema model for normalizr.
//!
//! Schemas describe how a JSON tree is interpreted during normalization:
//! - [`Schema`] — closed union over the four schema kinds
//! - [`EntitySchema`] — an identified type extracted into its own table
//! - [`IterableSchema`] — an array or map of items, homogeneous or polymorphic
//! - [`UnionSchema`] — a single polymorphic reference
//! - [`StructuralSchema`] — a plain field → schema mapping
//! - [`MergeStrategy`] — pluggable conflict resolution for repeated entities
//! - [`SchemaDocument`] — declarative JSON form, built into a [`Schema`]
//!
//! Schemas are built once and shared across any number of `normalize`
//! calls; they are `Send + Sync` and cheap to clone.

mod document;
mod entity;
mod polymorphic;
mod schema;
mod strategy;

pub use document::{EntityDocument, PolymorphicNode, SchemaDocument, SchemaNode};
pub use entity::{EntityOptions, EntitySchema, IdAttribute};
pub use polymorphic::{IterableSchema, Items, Polymorphic, Selector, UnionSchema};
pub use schema::{
    Schema, StructuralSchema, array_of, array_of_polymorphic, union_of, values_of,
    values_of_polymorphic,
};
pub use strategy::MergeStrategy;
