//! Merge diagnostics.
//!
//! A conflict is raised when the same field of the same entity is visited
//! twice with values that are not deep-equal. Conflicts are observations,
//! not failures: the call always continues.

use crate::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single diverging field, as reported by a merge strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConflict {
    pub field: String,
    /// The value that was kept.
    pub existing: Value,
    /// The value that was discarded.
    pub incoming: Value,
}

impl FieldConflict {
    pub fn new(field: impl Into<String>, existing: Value, incoming: Value) -> Self {
        Self {
            field: field.into(),
            existing,
            incoming,
        }
    }
}

/// A field conflict located on a concrete entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConflict {
    pub entity_key: String,
    pub id: EntityId,
    pub field: String,
    pub existing: Value,
    pub incoming: Value,
}

impl MergeConflict {
    /// Attaches entity coordinates to a strategy-reported conflict.
    #[must_use]
    pub fn locate(entity_key: &str, id: &EntityId, conflict: FieldConflict) -> Self {
        Self {
            entity_key: entity_key.to_string(),
            id: id.clone(),
            field: conflict.field,
            existing: conflict.existing,
            incoming: conflict.incoming,
        }
    }
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "when merging two {} (id {}), found unequal data in their \"{}\" values; using the earlier value ({} kept, {} dropped)",
            self.entity_key, self.id, self.field, self.existing, self.incoming
        )
    }
}
