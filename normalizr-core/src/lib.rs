//! Schema-driven normalization of nested JSON.
//!
//! [`normalize`] walks a JSON tree alongside a [`Schema`], pulls every entity
//! out into a flat table keyed by entity key and id, and replaces it in the
//! tree by its id:
//!
//! ```
//! use normalizr_core::{EntityOptions, EntitySchema, NormalizeOptions, array_of, normalize};
//! use serde_json::json;
//!
//! let user = EntitySchema::new("users", EntityOptions::default());
//! let article = EntitySchema::new("articles", EntityOptions::default());
//! article.define("author", user.to_schema());
//!
//! let data = json!([{"id": 1, "title": "Hi", "author": {"id": 7, "name": "Ann"}}]);
//! let out = normalize(&data, &array_of(&article), &NormalizeOptions::default()).unwrap();
//!
//! assert_eq!(out.result, json!([1]));
//! assert_eq!(out.entities.to_value()["articles"]["1"]["author"], json!(7));
//! ```
//!
//! A call runs in three stages:
//! - the visitor descends once, producing `result` and filling the bag;
//! - repeated entities are merged by a [`MergeStrategy`] ([`FirstSeenWins`]
//!   unless configured otherwise), conflicts are logged and collected;
//! - the association linker synthesizes reverse links for relations that
//!   two entity types declare on each other.
//!
//! Every call is independent: the bag is created per call and returned in
//! [`Normalized`]. Schemas are shared read-only and may be used from many
//! threads at once.

mod linker;
mod merge;
mod options;
mod output;
mod visitor;

pub use merge::FirstSeenWins;
pub use options::{AssignEntity, DEFAULT_MAX_DEPTH, InsertField, NormalizeOptions};
pub use output::{Entities, EntityTable, Normalized};

pub use normalizr_schema::{
    EntityOptions, EntitySchema, IdAttribute, IterableSchema, Items, MergeStrategy, Polymorphic,
    Schema, SchemaDocument, Selector, StructuralSchema, UnionSchema, array_of,
    array_of_polymorphic, union_of, values_of, values_of_polymorphic,
};
pub use normalizr_types::{EntityId, Error, FieldConflict, MergeConflict, Record, Result};

use serde_json::Value;
use tracing::debug;

/// Normalizes `data` against `schema`.
///
/// `data` must be a JSON object or array (`Error::InvalidInput` otherwise).
pub fn normalize(data: &Value, schema: &Schema, options: &NormalizeOptions) -> Result<Normalized> {
    ensure_composite(data)?;

    let mut visitor = visitor::Visitor::new(options);
    let result = visitor.dispatch(data, schema)?;
    let (mut entities, conflicts) = visitor.finish();
    let reverse_links = linker::link_associations(schema, &mut entities);

    debug!(
        entity_types = entities.keys().count(),
        records = entities.len(),
        conflicts = conflicts.len(),
        reverse_links,
        "Normalized payload"
    );

    Ok(Normalized {
        result,
        entities,
        conflicts,
    })
}

/// Normalizes `data` against a schema given as a JSON [`SchemaDocument`].
///
/// Input is checked before the schema, so a scalar payload reports
/// `InvalidInput` even when the schema is malformed too.
pub fn normalize_value(
    data: &Value,
    schema: &Value,
    options: &NormalizeOptions,
) -> Result<Normalized> {
    ensure_composite(data)?;
    let schema = SchemaDocument::from_value(schema)?.build()?;
    normalize(data, &schema, options)
}

fn ensure_composite(data: &Value) -> Result<()> {
    let kind = match data {
        Value::Object(_) | Value::Array(_) => return Ok(()),
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
    };
    Err(Error::InvalidInput(format!(
        "normalize accepts an object or an array, got {kind}"
    )))
}
