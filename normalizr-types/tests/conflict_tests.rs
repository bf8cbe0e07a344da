use normalizr_types::{EntityId, Error, FieldConflict, MergeConflict};
use serde_json::json;

#[test]
fn locate_carries_entity_coordinates() {
    let fc = FieldConflict::new("title", json!("a"), json!("b"));
    let c = MergeConflict::locate("articles", &EntityId::Int(1), fc);
    assert_eq!(c.entity_key, "articles");
    assert_eq!(c.id, EntityId::Int(1));
    assert_eq!(c.field, "title");
    assert_eq!(c.existing, json!("a"));
    assert_eq!(c.incoming, json!("b"));
}

#[test]
fn display_names_key_field_and_both_values() {
    let c = MergeConflict::locate(
        "users",
        &EntityId::from("u1"),
        FieldConflict::new("name", json!("Ann"), json!("Anne")),
    );
    let msg = c.to_string();
    assert!(msg.contains("users"));
    assert!(msg.contains("\"name\""));
    assert!(msg.contains("\"Ann\""));
    assert!(msg.contains("\"Anne\""));
}

#[test]
fn conflict_serializes() {
    let c = MergeConflict::locate(
        "users",
        &EntityId::Int(2),
        FieldConflict::new("a", json!(1), json!(2)),
    );
    let v = serde_json::to_value(&c).unwrap();
    assert_eq!(
        v,
        json!({"entity_key": "users", "id": 2, "field": "a", "existing": 1, "incoming": 2})
    );
}

// ── Error display ────────────────────────────────────────────────

#[test]
fn error_messages() {
    assert_eq!(
        Error::InvalidInput("number".into()).to_string(),
        "invalid input: number"
    );
    assert_eq!(
        Error::InvalidSchema("array".into()).to_string(),
        "invalid schema: array"
    );
    assert_eq!(
        Error::InvalidId { entity_key: "users".into(), value: "null".into() }.to_string(),
        "invalid id for entity 'users': null"
    );
    assert_eq!(
        Error::RecursionLimit { limit: 4 }.to_string(),
        "recursion limit of 4 exceeded"
    );
}

#[test]
fn serde_error_converts() {
    let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
    assert!(matches!(err, Error::Serialization(_)));
}
