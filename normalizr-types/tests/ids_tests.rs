use normalizr_types::EntityId;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

// ── from_value ────────────────────────────────────────────────────

#[test]
fn integer_value_becomes_int_id() {
    assert_eq!(EntityId::from_value(&json!(10)), Some(EntityId::Int(10)));
}

#[test]
fn negative_integer_is_accepted() {
    assert_eq!(EntityId::from_value(&json!(-3)), Some(EntityId::Int(-3)));
}

#[test]
fn string_value_becomes_str_id() {
    assert_eq!(
        EntityId::from_value(&json!("abc")),
        Some(EntityId::Str("abc".to_string()))
    );
}

#[test]
fn integer_text_is_the_same_id_as_the_integer() {
    assert_eq!(EntityId::from_value(&json!("10")), Some(EntityId::Int(10)));
    assert_eq!(EntityId::from_value(&json!("-3")), EntityId::from_value(&json!(-3)));
}

#[test]
fn non_canonical_integer_text_stays_a_string() {
    for text in ["007", "+7", "-0", " 7", "1e3"] {
        assert_eq!(
            EntityId::from_value(&json!(text)),
            Some(EntityId::Str(text.to_string())),
            "{text}"
        );
    }
}

#[test]
fn integer_text_beyond_i64_stays_a_string() {
    let text = "9223372036854775808";
    assert_eq!(EntityId::from_value(&json!(text)), Some(EntityId::Str(text.to_string())));
}

#[test]
fn non_scalar_values_are_rejected() {
    for v in [json!(null), json!(true), json!(1.5), json!([1]), json!({"id": 1})] {
        assert_eq!(EntityId::from_value(&v), None, "{v} should not be an id");
    }
}

#[test]
fn u64_beyond_i64_is_rejected() {
    assert_eq!(EntityId::from_value(&json!(u64::MAX)), None);
}

// ── to_value ──────────────────────────────────────────────────────

#[test]
fn to_value_keeps_representation() {
    assert_eq!(EntityId::Int(7).to_value(), json!(7));
    assert_eq!(EntityId::from("x").to_value(), json!("x"));
}

// ── parse / display ──────────────────────────────────────────────

#[test]
fn parse_integer_text() {
    assert_eq!(EntityId::parse("42"), EntityId::Int(42));
}

#[test]
fn parse_other_text() {
    assert_eq!(EntityId::parse("user-1"), EntityId::Str("user-1".into()));
}

#[test]
fn parse_keeps_leading_zeros() {
    assert_eq!(EntityId::parse("010"), EntityId::Str("010".into()));
}

#[test]
fn string_conversions_match_parse() {
    assert_eq!(EntityId::from("12"), EntityId::Int(12));
    assert_eq!(EntityId::from("12".to_string()), EntityId::Int(12));
    assert_eq!(EntityId::from("0-441".to_string()), EntityId::Str("0-441".into()));
}

#[test]
fn from_str_matches_parse() {
    let id = EntityId::from_str("9").unwrap();
    assert_eq!(id, EntityId::Int(9));
}

#[test]
fn display_is_bare() {
    assert_eq!(EntityId::Int(5).to_string(), "5");
    assert_eq!(EntityId::from("a").to_string(), "a");
}

// ── ordering / hashing ───────────────────────────────────────────

#[test]
fn ints_sort_before_strings() {
    let mut ids = vec![EntityId::from("b"), EntityId::Int(2), EntityId::from("a"), EntityId::Int(1)];
    ids.sort();
    assert_eq!(
        ids,
        vec![EntityId::Int(1), EntityId::Int(2), EntityId::from("a"), EntityId::from("b")]
    );
}

#[test]
fn hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(EntityId::Int(1));
    set.insert(EntityId::Int(1));
    set.insert(EntityId::from("1"));
    set.insert(EntityId::from("one"));
    assert_eq!(set.len(), 2);
}

// ── serialization ────────────────────────────────────────────────

#[test]
fn serializes_untagged() {
    assert_eq!(serde_json::to_value(EntityId::Int(3)).unwrap(), json!(3));
    assert_eq!(serde_json::to_value(EntityId::from("z")).unwrap(), json!("z"));
}

#[test]
fn deserializes_to_canonical_id() {
    let ids: Vec<EntityId> = serde_json::from_value(json!([7, "7", "007"])).unwrap();
    assert_eq!(ids, vec![EntityId::Int(7), EntityId::Int(7), EntityId::Str("007".into())]);
}

#[test]
fn serializes_as_map_key() {
    let mut map = BTreeMap::new();
    map.insert(EntityId::Int(1), "one");
    map.insert(EntityId::from("b"), "bee");
    let v: Value = serde_json::to_value(&map).unwrap();
    assert_eq!(v, json!({"1": "one", "b": "bee"}));
}

proptest! {
    #[test]
    fn integer_ids_survive_value_conversion(n in any::<i64>()) {
        let id = EntityId::from_value(&json!(n)).unwrap();
        prop_assert_eq!(id.to_value(), json!(n));
    }

    #[test]
    fn string_ids_survive_value_conversion(s in "[a-z][a-z0-9-]{0,23}") {
        let id = EntityId::from_value(&json!(s.clone())).unwrap();
        prop_assert_eq!(id.to_value(), json!(s));
    }

    #[test]
    fn integer_and_its_text_are_one_id(n in any::<i64>()) {
        prop_assert_eq!(
            EntityId::from_value(&json!(n.to_string())),
            EntityId::from_value(&json!(n))
        );
    }

    #[test]
    fn display_then_parse_is_identity(s in "[a-z0-9+-]{0,12}") {
        let id = EntityId::parse(&s);
        prop_assert_eq!(EntityId::parse(&id.to_string()), id.clone());
        prop_assert_eq!(id.to_string(), s);
    }
}
