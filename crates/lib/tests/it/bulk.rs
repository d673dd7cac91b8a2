//! Bulk operation tests
//!
//! Operations run against a Collection built from the snapshot. The caller
//! gets the operation's own result while the collection's final state is
//! synced back to the host.

use schemaless::{AttributeBag, Collection, Error};
use serde_json::{Value, json};

use crate::helpers::*;

#[test]
fn test_filter_result_is_decoupled_from_state() {
    let mut record = record_with(json!({"a": 1, "b": 2}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let removed = bag
        .filter(|key, _| key == "a")
        .expect("Failed to filter");

    assert_eq!(removed, 1);
    assert_eq!(bag.to_value(), json!({"a": 1}));
    assert_in_sync(&bag);
}

#[test]
fn test_bulk_closure_returns_its_own_value() {
    let mut record = record_with(json!({"a": 1, "b": 2, "c": 3}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let summary = bag
        .bulk(|items| {
            items.pull("b");
            items.put("d", 4);
            items.values().iter().filter_map(Value::as_i64).sum::<i64>()
        })
        .expect("Failed to run bulk operation");

    assert_eq!(summary, 8);
    assert_eq!(bag.to_value(), json!({"a": 1, "c": 3, "d": 4}));
    assert_in_sync(&bag);
}

#[test]
fn test_try_bulk_error_leaves_state_unchanged() {
    #[derive(Debug)]
    enum AppError {
        Invalid(&'static str),
        Library(Error),
    }

    impl From<Error> for AppError {
        fn from(err: Error) -> Self {
            AppError::Library(err)
        }
    }

    let mut record = record_with(json!({"a": 1}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let result: Result<(), AppError> = bag.try_bulk(|items| {
        items.put("b", 2);
        Err(AppError::Invalid("rejected"))
    });

    assert!(matches!(result, Err(AppError::Invalid("rejected"))));
    assert_eq!(bag.to_value(), json!({"a": 1}));
    assert_in_sync(&bag);

    let pushed: Result<String, AppError> = bag.try_bulk(|items| Ok(items.push("next")));
    assert_eq!(pushed.expect("Failed to push"), "0");
    assert_eq!(bag.to_value(), json!({"a": 1, "0": "next"}));
}

#[test]
fn test_bulk_host_rejection_rolls_back() {
    let mut record = record_with(json!({"a": 1, "b": 2}));
    record.guard(ATTRIBUTE);
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    let err = bag.take(1).unwrap_err();
    assert!(err.is_rejected_write());
    assert_eq!(bag.len(), 2);
}

#[test]
fn test_forwarded_operations() {
    let mut record = record_with(json!({
        "u1": {"name": "ada", "age": 36},
        "u2": {"name": "alan", "age": 41},
        "u3": {"name": "grace", "age": 29}
    }));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    bag.sort_by(|a, b| a["age"].as_i64().cmp(&b["age"].as_i64()))
        .expect("Failed to sort");
    let keys: Vec<&String> = bag.keys().collect();
    assert_eq!(keys, ["u3", "u1", "u2"]);

    assert_eq!(bag.take(2).expect("Failed to take"), 1);
    assert_eq!(bag.pluck("name").expect("Failed to pluck"), 2);
    assert_eq!(bag.to_value(), json!({"u3": "grace", "u1": "ada"}));
    assert_in_sync(&bag);

    bag.sort_keys().expect("Failed to sort keys");
    bag.map(|key, value| json!(format!("{key}:{}", value.as_str().unwrap_or_default())))
        .expect("Failed to map");
    assert_eq!(bag.to_value(), json!({"u1": "u1:ada", "u3": "u3:grace"}));
    assert_in_sync(&bag);
}

#[test]
fn test_keyed_operations() {
    let mut record = record_with(json!({"a": 1, "b": 2, "c": 3}));
    let mut bag = AttributeBag::new(&mut record, ATTRIBUTE);

    assert_eq!(bag.only(["a", "b"]).expect("only"), 1);
    assert_eq!(bag.except(["b"]).expect("except"), 1);
    assert_eq!(bag.reject(|_, v| v == &json!(0)).expect("reject"), 0);

    assert_eq!(bag.put("a.b", "literal").expect("put"), None);
    assert_eq!(bag.get_ref("a.b"), None, "put should not interpret dots");
    assert!(bag.contains_key("a.b"));

    bag.prepend("first", true).expect("prepend");
    assert_eq!(bag.shift().expect("shift"), Some(("first".to_string(), json!(true))));
    assert_eq!(bag.pop().expect("pop"), Some(("a.b".to_string(), json!("literal"))));
    assert_eq!(bag.pull("a").expect("pull"), Some(json!(1)));
    assert!(bag.is_empty());
    assert_in_sync(&bag);
}

#[test]
fn test_collection_from_array() {
    let collection = Collection::from_value(json!(["x", "y"])).expect("Arrays are iterable");
    assert_eq!(collection.keys(), ["0", "1"]);
    assert!(Collection::from_value(json!(3)).is_none());
}
