//! Tree operation tests
//!
//! Path-addressed access on plain maps, independent of any host record.

use schemaless::{Path, tree};
use serde_json::{Map, Value, json};

use crate::helpers::object;

#[test]
fn test_set_then_get_nested_paths() {
    let mut data = Map::new();
    let cases = [
        ("name", json!("ada")),
        ("address.city", json!("London")),
        ("address.geo.lat", json!(51.5)),
        ("tags.0", json!("math")),
        ("flags", json!({"admin": false})),
    ];

    for (path, value) in &cases {
        tree::set(&mut data, *path, value.clone()).expect("Failed to set path");
        assert_eq!(tree::get(&data, *path).as_ref(), Some(value), "path {path}");
    }

    assert_eq!(
        Value::Object(data),
        json!({
            "name": "ada",
            "address": {"city": "London", "geo": {"lat": 51.5}},
            "tags": ["math"],
            "flags": {"admin": false}
        })
    );
}

#[test]
fn test_get_or_returns_default_only_when_missing() {
    let data = object(json!({"present": null, "zero": 0}));

    assert_eq!(tree::get_or(&data, "missing", "fallback"), json!("fallback"));
    assert_eq!(tree::get_or(&data, "present", "fallback"), Value::Null);
    assert_eq!(tree::get_or(&data, "zero.deeper", 7), json!(7));
    assert_eq!(tree::get_or(&data, "zero", 7), json!(0));
}

#[test]
fn test_forget_is_idempotent() {
    let mut data = object(json!({"a": {"b": 1, "c": 2}}));

    assert!(tree::forget(&mut data, "a.b"));
    let after_first = data.clone();
    assert!(!tree::forget(&mut data, "a.b"));
    assert_eq!(data, after_first);
    assert_eq!(Value::Object(data), json!({"a": {"c": 2}}));
}

#[test]
fn test_forget_prefers_literal_dotted_key() {
    let mut data = object(json!({"a.b": "literal", "a": {"b": "nested"}}));

    assert!(tree::forget(&mut data, "a.b"));
    assert_eq!(Value::Object(data.clone()), json!({"a": {"b": "nested"}}));

    assert!(tree::forget(&mut data, "a.b"));
    assert_eq!(Value::Object(data), json!({"a": {}}));
}

#[test]
fn test_merge_accumulates_and_overwrites() {
    let mut data = Map::new();
    tree::merge(&mut data, json!({"x": 1})).expect("Failed to merge");
    tree::merge(&mut data, json!({"y": 2})).expect("Failed to merge");
    tree::merge(&mut data, json!({"x": {"nested": true}})).expect("Failed to merge");

    assert_eq!(Value::Object(data), json!({"x": {"nested": true}, "y": 2}));
}

#[test]
fn test_merge_rejects_scalars() {
    let mut data = object(json!({"keep": 1}));

    for source in [json!(null), json!(1), json!("text"), json!(true)] {
        let err = tree::merge(&mut data, source).unwrap_err();
        assert!(err.is_not_iterable());
    }
    assert_eq!(Value::Object(data), json!({"keep": 1}));
}

#[test]
fn test_wildcards_across_objects_and_arrays() {
    let mut data = object(json!({
        "teams": {
            "red": {"members": [{"name": "ada"}, {"name": "alan"}]},
            "blue": {"members": [{"name": "grace"}]}
        }
    }));

    assert_eq!(
        tree::get(&data, "teams.*.members.*.name"),
        Some(json!(["ada", "alan", "grace"]))
    );

    tree::set(&mut data, "teams.*.score", 0).expect("Failed to set wildcard path");
    assert_eq!(tree::get(&data, "teams.*.score"), Some(json!([0, 0])));
}

#[test]
fn test_paths_built_at_runtime() {
    let mut data = Map::new();
    let user = "ada";

    let langs = format!("users.{user}.langs.0");
    tree::set(&mut data, &langs, "rust").expect("Failed to set");
    assert_eq!(
        tree::get(&data, Path::new(&format!("users.{user}"))),
        Some(json!({"langs": ["rust"]}))
    );
}

#[test]
fn test_empty_path_behaviour() {
    let mut data = object(json!({"a": 1}));

    assert_eq!(tree::get(&data, ""), Some(json!({"a": 1})));
    assert!(!tree::forget(&mut data, "..."));

    let err = tree::set(&mut data, "", 5).unwrap_err();
    assert!(err.is_path_error());
    assert_eq!(err.module(), "path");
}
