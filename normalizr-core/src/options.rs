//! Per-call configuration and the assign strategy.

use normalizr_schema::MergeStrategy;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Default nesting limit for one call.
///
/// Matches `serde_json`'s own parse limit and fits a 2 MiB thread stack in
/// unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Places one normalized field into the output object of a structural visit.
///
/// The default, [`InsertField`], sets `output[key] = value`. Custom
/// implementations may rename keys, drop fields or split one field into
/// several; whatever they write is what the caller observes.
///
/// Only object output goes through the strategy. An array under a structural
/// schema keeps one normalized element per index and never calls `assign`,
/// since an array has no keys to rename or drop.
pub trait AssignEntity: Send + Sync {
    fn assign(&self, output: &mut Map<String, Value>, key: &str, value: Value);
}

impl<F> AssignEntity for F
where
    F: Fn(&mut Map<String, Value>, &str, Value) + Send + Sync,
{
    fn assign(&self, output: &mut Map<String, Value>, key: &str, value: Value) {
        self(output, key, value)
    }
}

/// `output[key] = value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertField;

impl AssignEntity for InsertField {
    fn assign(&self, output: &mut Map<String, Value>, key: &str, value: Value) {
        output.insert(key.to_string(), value);
    }
}

/// Configuration for one `normalize` call.
#[derive(Clone)]
pub struct NormalizeOptions {
    /// Placement of fields in structural output.
    pub assign_entity: Arc<dyn AssignEntity>,
    /// Merge strategy for entities whose schema has none of its own.
    /// `None` selects `FirstSeenWins`.
    pub merge_into_entity: Option<Arc<dyn MergeStrategy>>,
    /// Deepest nesting accepted before failing with `RecursionLimit`.
    pub max_depth: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            assign_entity: Arc::new(InsertField),
            merge_into_entity: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl NormalizeOptions {
    #[must_use]
    pub fn with_assign_entity(mut self, assign: Arc<dyn AssignEntity>) -> Self {
        self.assign_entity = assign;
        self
    }

    #[must_use]
    pub fn with_merge_strategy(mut self, strategy: Arc<dyn MergeStrategy>) -> Self {
        self.merge_into_entity = Some(strategy);
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl fmt::Debug for NormalizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeOptions")
            .field("custom_merge", &self.merge_into_entity.is_some())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
