//! AttributeBag tests
//!
//! Covers path access through the bag, synchronization with the host record
//! after every mutation, and rollback when the host refuses a write.

use schemaless::{AttributeBag, HostRecord, JsonFormat, Record};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::helpers::*;

#[test]
fn test_construction_decodes_host_attribute() {
    let mut record = record_with(json!({"name": "ada", "langs": ["en", "fr"]}));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    assert_eq!(bag.attribute_name(), ATTRIBUTE);
    assert_eq!(bag.len(), 2);
    assert_eq!(bag.get("langs.1"), Some(json!("fr")));
}

#[test]
fn test_construction_tolerates_bad_sources() {
    for raw in ["", "not json", "42", "\"text\"", "null", "{\"unterminated\":"] {
        let mut record = record_with_raw(raw);
        let bag = AttributeBag::new(&mut record, ATTRIBUTE);
        assert!(bag.is_empty(), "source {raw:?} should start empty");
    }

    let mut record = Record::new();
    let bag = AttributeBag::for_record(&mut record, "missing");
    assert!(bag.is_empty());
}

#[test]
fn test_top_level_array_source_is_index_keyed() {
    let mut record = record_with(json!(["a", "b"]));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    assert_eq!(bag.to_value(), json!({"0": "a", "1": "b"}));
}

#[test]
fn test_set_syncs_host() {
    let mut record = record_with(json!({}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    bag.set("profile.name", "ada")
        .expect("Failed to set profile.name")
        .set("profile.langs.0", "en")
        .expect("Failed to set profile.langs.0");

    assert_in_sync(&bag);
    assert_eq!(bag.get("profile.name"), Some(json!("ada")));
    drop(bag);

    assert_eq!(
        host_value(&record),
        json!({"profile": {"name": "ada", "langs": ["en"]}})
    );
}

#[test]
fn test_every_mutation_keeps_host_in_sync() {
    let mut record = record_with(json!({"a": 1, "b": {"c": 2}}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    bag.set("b.d", 3).expect("Failed to set");
    assert_in_sync(&bag);
    bag.merge(json!({"e": [1, 2]})).expect("Failed to merge");
    assert_in_sync(&bag);
    bag.forget("b.c").expect("Failed to forget");
    assert_in_sync(&bag);
    bag.forget_many(["a", "e.0", "missing"])
        .expect("Failed to forget many");
    assert_in_sync(&bag);
    assert_eq!(bag.to_value(), json!({"b": {"d": 3}, "e": {"1": 2}}));

    bag.clear().expect("Failed to clear");
    assert_in_sync(&bag);
    assert!(bag.is_empty());
}

#[test]
fn test_get_or_for_unset_paths() {
    let mut record = record_with(json!({"a": {"b": 1}}));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    assert_eq!(bag.get_or("a.x", "default"), json!("default"));
    assert_eq!(bag.get_or("a.b", "default"), json!(1));
    assert_eq!(bag.get("a.x"), None);
}

#[test]
fn test_forget_is_idempotent() {
    let mut record = record_with(json!({"a": 1, "b": 2}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    bag.forget("a").expect("Failed to forget");
    let once = bag.to_map();
    bag.forget("a").expect("Forgetting again should not fail");

    assert_eq!(bag.to_map(), once);
    assert_in_sync(&bag);
}

#[test]
fn test_forget_array_element_is_idempotent() {
    let mut record = record_with(json!({"list": ["a", "b", "c"]}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    bag.forget("list.0").expect("Failed to forget");
    let once = bag.to_map();
    bag.forget("list.0").expect("Forgetting again should not fail");

    assert_eq!(bag.to_map(), once);
    assert_eq!(bag.get("list.1"), Some(json!("b")));
    assert_eq!(bag.get("list.2"), Some(json!("c")));
    assert_in_sync(&bag);
}

#[test]
fn test_merge_accumulates() {
    let mut record = Record::new();
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    bag.merge(json!({"x": 1})).expect("Failed to merge x");
    bag.merge(json!({"y": 2})).expect("Failed to merge y");

    assert_eq!(bag.to_value(), json!({"x": 1, "y": 2}));
}

#[test]
fn test_merge_scalar_leaves_state_untouched() {
    let mut record = record_with(json!({"x": 1}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let err = bag.merge("scalar").unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(err.module(), "tree");
    assert_eq!(bag.to_value(), json!({"x": 1}));
    assert_in_sync(&bag);
}

#[test]
fn test_empty_path_set_is_rejected() {
    let mut record = record_with(json!({"x": 1}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let err = bag.set("", 5).unwrap_err();
    assert!(err.is_path_error());
    assert_eq!(bag.to_value(), json!({"x": 1}));
}

#[test]
fn test_guarded_host_rolls_back() {
    let mut record = record_with(json!({"x": 1}));
    record.guard(ATTRIBUTE);
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let err = bag.set("y", 2).unwrap_err();
    assert!(err.is_rejected_write());
    assert_eq!(bag.to_value(), json!({"x": 1}));

    assert!(bag.merge(json!({"z": 3})).is_err());
    assert!(bag.forget("x").is_err());
    assert!(bag.clear().is_err());
    assert_eq!(bag.to_value(), json!({"x": 1}));
    drop(bag);

    assert_eq!(host_value(&record), json!({"x": 1}));
}

#[test]
fn test_to_json_round_trips() {
    let mut record = record_with(json!({"b": [1, {"c": null}], "a": "text"}));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let compact = bag.to_json().expect("Failed to encode");
    let decoded: Value = serde_json::from_str(&compact).expect("Invalid JSON");
    assert_eq!(decoded, Value::Object(bag.to_map()));
    assert_eq!(compact, r#"{"b":[1,{"c":null}],"a":"text"}"#);
    assert_eq!(bag.to_string(), compact);

    let pretty = bag
        .to_json_with(JsonFormat::Pretty)
        .expect("Failed to encode");
    assert!(pretty.contains('\n'));
    assert_eq!(serde_json::from_str::<Value>(&pretty).unwrap(), decoded);

    assert_eq!(serde_json::to_value(&bag).unwrap(), decoded);
}

#[test]
fn test_presence_checks() {
    let mut record = record_with(json!({
        "null": null,
        "zero": 0,
        "zero_text": "0",
        "empty": [],
        "name": "ada",
        "dotted.key": true
    }));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    assert!(!bag.is_set("null"));
    assert!(!bag.is_set("missing"));
    assert!(bag.is_set("zero"));

    for blank in ["null", "zero", "zero_text", "empty", "missing"] {
        assert!(bag.is_blank(blank), "{blank} should be blank");
    }
    assert!(!bag.is_blank("name"));

    assert!(bag.contains_key("dotted.key"));
    assert!(!bag.contains_key("dotted"));
}

#[test]
fn test_index_and_iteration() {
    let mut record = record_with(json!({"a": 1, "b": {"c": 2}}));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    assert_eq!(bag["b.c"], json!(2));
    assert_eq!(bag["missing"], Value::Null);

    let keys: Vec<&String> = bag.keys().collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(bag.values().count(), 2);
    assert_eq!(bag.count(), 2);

    let mut seen = Vec::new();
    for (key, _) in &bag {
        seen.push(key.clone());
    }
    assert_eq!(seen, ["a", "b"]);
    assert_eq!(bag.iter().next(), Some((&"a".to_string(), &json!(1))));
}

#[test]
fn test_get_as_deserializes() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Address {
        city: String,
        zip: Option<String>,
    }

    let mut record = record_with(json!({"address": {"city": "London"}, "age": "old"}));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let address: Option<Address> = bag.get_as("address").expect("Failed to decode");
    assert_eq!(
        address,
        Some(Address {
            city: "London".to_string(),
            zip: None
        })
    );
    assert_eq!(bag.get_as::<u32>("missing").expect("Missing is not an error"), None);

    let err = bag.get_as::<u32>("age").unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(err.module(), "bag");
}

#[test]
fn test_reload_discards_snapshot() {
    let mut record = record_with(json!({"a": 1}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);
    bag.set("b", 2).expect("Failed to set");

    bag.reload();
    assert_eq!(bag.to_value(), json!({"a": 1, "b": 2}));
}

#[test]
fn test_get_ref_borrows_without_wildcards() {
    let mut record = record_with(json!({"*": "literal", "list": [1, 2]}));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    assert_eq!(bag.get_ref("*"), Some(&json!("literal")));
    assert_eq!(bag.get_ref("list.1"), Some(&json!(2)));
    assert_eq!(bag.get("list.*"), Some(json!([1, 2])));
}

#[test]
fn test_index_treats_wildcard_literally() {
    let mut record = record_with(json!({
        "users": {"u1": {"name": "ada"}, "u2": {"name": "bob"}}
    }));
    let bag = AttributeBag::new(&mut record, ATTRIBUTE);

    assert_eq!(bag["users.*.name"], Value::Null);
    assert_eq!(bag.get("users.*.name"), Some(json!(["ada", "bob"])));
    assert_eq!(bag["users.u2.name"], json!("bob"));
}

#[test]
fn test_host_is_reachable_through_bag() {
    let mut record = record_with(json!({})).with_attribute("title", "plain text");
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);
    bag.set("a", 1).expect("Failed to set");

    assert_eq!(bag.host().raw_attribute("title").as_deref(), Some("plain text"));
    assert_eq!(bag.host().raw_attribute(ATTRIBUTE).as_deref(), Some(r#"{"a":1}"#));
}
