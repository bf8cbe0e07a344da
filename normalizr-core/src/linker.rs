//! Reverse-link synthesis for bidirectional many-to-many relations.
//!
//! Entity type S links to T when S has a relation field named exactly
//! `T.key` that targets T, and T has a relation field named exactly `S.key`.
//! For every such pair, each parent id of S is appended to the `S.key` field
//! of every child of T it lists. No other naming convention is recognized.
//!
//! All links are collected from the bag as the descent left it and applied
//! afterwards, so synthesized ids never feed further synthesis. Ids are not
//! deduplicated.

use crate::output::Entities;
use normalizr_schema::Schema;
use normalizr_types::EntityId;
use serde_json::Value;
use serde_json::map::Entry;
use tracing::{debug, trace, warn};

struct ReverseLink {
    child_key: String,
    child_id: EntityId,
    field: String,
    parent_id: EntityId,
}

/// Runs the post-pass over a finished bag. Returns the number of ids appended.
pub(crate) fn link_associations(root: &Schema, bag: &mut Entities) -> usize {
    let links = collect_links(root, bag);
    let mut applied = 0;

    for link in links {
        let Some(child) = bag.get_mut(&link.child_key, &link.child_id) else {
            continue;
        };
        match child.entry(link.field.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Value::Array(vec![link.parent_id.to_value()]));
                applied += 1;
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(ids) => {
                    ids.push(link.parent_id.to_value());
                    applied += 1;
                }
                other => {
                    warn!(
                        entity_key = %link.child_key,
                        id = %link.child_id,
                        field = %link.field,
                        value = %other,
                        "Cannot add reverse link to a non-array field"
                    );
                }
            },
        }
    }
    applied
}

fn collect_links(root: &Schema, bag: &Entities) -> Vec<ReverseLink> {
    let mut links = Vec::new();

    for parent in root.reachable_entities() {
        let parent_key = parent.key();
        for (field, relation) in parent.relations() {
            let Some(child) = relation.target_entity() else {
                continue;
            };
            let child_key = child.key();
            if field != child_key || !child.has_relation(parent_key) {
                continue;
            }
            let Some(parents) = bag.table(parent_key) else {
                continue;
            };

            trace!(parent = parent_key, child = child_key, "Linking bidirectional relation");
            for (parent_id, record) in parents {
                for child_id in listed_ids(record.get(child_key)) {
                    if bag.get(child_key, &child_id).is_none() {
                        debug!(
                            entity_key = child_key,
                            id = %child_id,
                            "Reverse link target not in entities, skipping"
                        );
                        continue;
                    }
                    links.push(ReverseLink {
                        child_key: child_key.to_string(),
                        child_id,
                        field: parent_key.to_string(),
                        parent_id: parent_id.clone(),
                    });
                }
            }
        }
    }
    links
}

/// Ids held by a relation field: an array of ids or a single id.
fn listed_ids(field: Option<&Value>) -> Vec<EntityId> {
    match field {
        Some(Value::Array(values)) => values.iter().filter_map(EntityId::from_value).collect(),
        Some(value) => EntityId::from_value(value).into_iter().collect(),
        None => Vec::new(),
    }
}
