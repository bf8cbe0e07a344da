//! Core type definitions for normalizr.
//!
//! This crate defines the vocabulary shared by the schema model and the
//! normalization engine:
//! - [`EntityId`] — the canonical id an entity is stored and referenced under
//! - [`Record`] — a flattened entity (field name → JSON value)
//! - [`MergeConflict`] / [`FieldConflict`] — non-fatal merge diagnostics
//! - [`Error`] — the fatal failures of a `normalize` call

mod conflict;
mod ids;

pub use conflict::{FieldConflict, MergeConflict};
pub use ids::EntityId;

/// A normalized entity: field name → value, with nested entities replaced by ids.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a normalization call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Top-level data is neither an object nor an array.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Root schema is not a mapping or descriptor, or a schema document is malformed.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The id rule of an entity schema produced no usable scalar.
    #[error("invalid id for entity '{entity_key}': {value}")]
    InvalidId { entity_key: String, value: String },

    /// Input nesting exceeded the configured depth.
    #[error("recursion limit of {limit} exceeded")]
    RecursionLimit { limit: usize },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
