use normalizr_types::{FieldConflict, Record};

/// Resolves a repeated visit of the same entity within one call.
///
/// `existing` is the stored record, `incoming` the freshly normalized fields
/// of the current visit. Implementations fold `incoming` into `existing` and
/// return every field they refused to take, so the engine can report it.
///
/// The engine's default (`FirstSeenWins` in `normalizr-core`) keeps the
/// first-seen value of any field whose values differ. Implement this trait,
/// or pass a closure with the same signature, to change that policy for one
/// entity type (`EntityOptions::with_merge_strategy`) or for a whole call.
pub trait MergeStrategy: Send + Sync {
    fn merge(&self, entity_key: &str, existing: &mut Record, incoming: Record)
    -> Vec<FieldConflict>;
}

impl<F> MergeStrategy for F
where
    F: Fn(&str, &mut Record, Record) -> Vec<FieldConflict> + Send + Sync,
{
    fn merge(
        &self,
        entity_key: &str,
        existing: &mut Record,
        incoming: Record,
    ) -> Vec<FieldConflict> {
        self(entity_key, existing, incoming)
    }
}
