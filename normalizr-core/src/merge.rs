//! Default entity merge policy.

use normalizr_schema::MergeStrategy;
use normalizr_types::{FieldConflict, Record};

/// Keeps the first-seen value of every field.
///
/// For each incoming field:
/// - absent from the stored record, or deep-equal to the stored value → stored;
/// - otherwise the stored value is kept and the pair is reported as a conflict.
///
/// The result does not depend on visit order for non-conflicting fields, and
/// a conflicting field always resolves to whichever value was seen first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSeenWins;

impl MergeStrategy for FirstSeenWins {
    fn merge(
        &self,
        _entity_key: &str,
        existing: &mut Record,
        incoming: Record,
    ) -> Vec<FieldConflict> {
        let mut conflicts = Vec::new();
        for (field, value) in incoming {
            match existing.get(&field) {
                Some(current) if *current != value => {
                    conflicts.push(FieldConflict::new(field, current.clone(), value));
                }
                _ => {
                    existing.insert(field, value);
                }
            }
        }
        conflicts
    }
}
