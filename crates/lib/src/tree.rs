//! Path-addressed operations over a nested JSON tree.
//!
//! Every function here is pure: it reads or rewrites the map it is handed and
//! knows nothing about hosts or synchronization. The root of a tree is always
//! a JSON object (`serde_json::Map`); below the root, objects are indexed by
//! key and arrays by decimal index.
//!
//! # Wildcards
//!
//! A `*` segment addresses every child of the value it is applied to:
//!
//! ```rust
//! use schemaless::tree;
//! use serde_json::{Map, json};
//!
//! let mut tree = Map::new();
//! tree::set(&mut tree, "users", json!([{"name": "ada"}, {"name": "alan"}]))?;
//! assert_eq!(tree::get(&tree, "users.*.name"), Some(json!(["ada", "alan"])));
//!
//! tree::set(&mut tree, "users.*.active", true)?;
//! assert_eq!(tree::get(&tree, "users.1.active"), Some(json!(true)));
//! # Ok::<(), schemaless::Error>(())
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use crate::path::{Path, PathError, WILDCARD};

/// Errors raised by tree operations.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A merge source was not an object or an array
    #[error("Cannot merge a {found} into the tree: expected an object or an array")]
    NotIterable { found: &'static str },
}

impl TreeError {
    /// Check if this error was caused by a non-iterable merge source
    pub fn is_not_iterable(&self) -> bool {
        matches!(self, TreeError::NotIterable { .. })
    }
}

impl From<TreeError> for crate::Error {
    fn from(err: TreeError) -> Self {
        crate::Error::Tree(err)
    }
}

/// Gets a copy of the value at `path`.
///
/// Returns `None` if any segment is missing or lands on a value that cannot
/// be indexed. The empty path returns the whole tree. Wildcard segments
/// produce an array with one entry per child (`null` for children where the
/// rest of the path is missing); a second wildcard further down flattens the
/// per-child arrays into one.
pub fn get(tree: &Map<String, Value>, path: impl AsRef<Path>) -> Option<Value> {
    let segments: Vec<&str> = path.as_ref().components().collect();
    if segments.is_empty() {
        return Some(Value::Object(tree.clone()));
    }
    resolve(Node::Object(tree), &segments)
}

/// Gets the value at `path`, or `default` if it is missing.
pub fn get_or(tree: &Map<String, Value>, path: impl AsRef<Path>, default: impl Into<Value>) -> Value {
    get(tree, path).unwrap_or_else(|| default.into())
}

/// Borrows the value at `path`.
///
/// Unlike [`get`] this does not expand wildcards: a `*` segment is looked up
/// as a literal key.
pub fn get_ref<'a>(tree: &'a Map<String, Value>, path: impl AsRef<Path>) -> Option<&'a Value> {
    let mut segments = path.as_ref().components();
    let mut current = tree.get(segments.next()?)?;
    for segment in segments {
        current = Node::of(current)?.child(segment)?;
    }
    Some(current)
}

/// Sets `value` at `path`, creating intermediate containers as needed.
///
/// Missing intermediates are created as objects, or as arrays when the next
/// segment is an index or a wildcard. Intermediate scalars are replaced. For
/// arrays, an in-range index replaces the element and the index equal to the
/// length appends; any other key turns the array into an object keyed by the
/// old indices.
///
/// # Errors
///
/// Returns [`PathError::Empty`] if the path has no segments.
pub fn set(tree: &mut Map<String, Value>, path: impl AsRef<Path>, value: impl Into<Value>) -> crate::Result<()> {
    let path = path.as_ref();
    let segments: Vec<&str> = path.components().collect();
    if segments.is_empty() {
        return Err(PathError::Empty {
            operation: "set".to_string(),
        }
        .into());
    }
    set_in_map(tree, &segments, value.into());
    Ok(())
}

/// Removes the entry at `path`.
///
/// A top-level key equal to the full path string is removed first, so keys
/// that contain dots can still be forgotten. Otherwise the path is walked and
/// the final segment removed from its parent. Removing the last element of an
/// array pops it; any other index turns the array into an index-keyed object
/// first, so the remaining elements keep their paths. Missing paths are a
/// no-op.
///
/// Returns `true` if something was removed.
pub fn forget(tree: &mut Map<String, Value>, path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if tree.shift_remove(path.as_str()).is_some() {
        return true;
    }

    let segments: Vec<&str> = path.components().collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };
    let Some((first, rest)) = parents.split_first() else {
        return tree.shift_remove(*last).is_some();
    };

    let mut current = match tree.get_mut(*first) {
        Some(value) => value,
        None => return false,
    };
    for segment in rest {
        current = match child_mut(current, segment) {
            Some(child) => child,
            None => return false,
        };
    }

    match current {
        Value::Object(map) => map.shift_remove(*last).is_some(),
        Value::Array(items) => match array_index(last) {
            Some(index) if index + 1 == items.len() => {
                items.pop();
                true
            }
            Some(index) if index < items.len() => {
                let mut map = indexed(std::mem::take(items));
                map.shift_remove(*last);
                *current = Value::Object(map);
                true
            }
            _ => false,
        },
        _ => false,
    }
}

/// Shallow-merges `other` into `tree`.
///
/// Keys of `other` overwrite keys of `tree` (overwritten keys keep their
/// position, new keys are appended). Nested values are replaced wholesale.
/// An array source contributes its elements under their decimal indices.
///
/// # Errors
///
/// Returns [`TreeError::NotIterable`] for any other kind of source.
pub fn merge(tree: &mut Map<String, Value>, other: Value) -> Result<(), TreeError> {
    let found = kind(&other);
    let Some(items) = into_map(other) else {
        return Err(TreeError::NotIterable { found });
    };
    for (key, value) in items {
        tree.insert(key, value);
    }
    Ok(())
}

/// Converts an object or array into a map, indexing arrays by position.
///
/// Returns `None` for scalars and `null`.
pub fn into_map(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::Array(items) => Some(indexed(items)),
        _ => None,
    }
}

/// Returns a short name for the kind of a JSON value, for error messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Loose emptiness test: `null`, `false`, zero, `""`, `"0"`, and empty
/// arrays and objects are blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// A value that can be indexed by a path segment.
#[derive(Clone, Copy)]
enum Node<'a> {
    Object(&'a Map<String, Value>),
    Array(&'a [Value]),
}

impl<'a> Node<'a> {
    fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Node::Object(map)),
            Value::Array(items) => Some(Node::Array(items)),
            _ => None,
        }
    }

    fn child(self, segment: &str) -> Option<&'a Value> {
        match self {
            Node::Object(map) => map.get(segment),
            Node::Array(items) => items.get(array_index(segment)?),
        }
    }

    fn children(self) -> Vec<&'a Value> {
        match self {
            Node::Object(map) => map.values().collect(),
            Node::Array(items) => items.iter().collect(),
        }
    }
}

fn resolve(node: Node<'_>, segments: &[&str]) -> Option<Value> {
    let (first, rest) = segments.split_first()?;

    if *first == WILDCARD {
        let nested_wildcard = rest.contains(&WILDCARD);
        let mut matches = Vec::new();
        for child in node.children() {
            let found = if rest.is_empty() {
                Some(child.clone())
            } else {
                Node::of(child).and_then(|node| resolve(node, rest))
            };
            match found {
                Some(Value::Array(items)) if nested_wildcard => matches.extend(items),
                Some(_) if nested_wildcard => {}
                Some(value) => matches.push(value),
                None if nested_wildcard => {}
                None => matches.push(Value::Null),
            }
        }
        return Some(Value::Array(matches));
    }

    let child = node.child(first)?;
    if rest.is_empty() {
        return Some(child.clone());
    }
    resolve(Node::of(child)?, rest)
}

fn set_in_map(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if *first == WILDCARD {
        for child in map.values_mut() {
            assign(child, rest, value.clone());
        }
        return;
    }

    match rest.first() {
        None => {
            map.insert(first.to_string(), value);
        }
        Some(next) => {
            let child = map
                .entry(first.to_string())
                .or_insert_with(|| empty_container(next));
            set_in_value(child, rest, value);
        }
    }
}

fn set_in_value(target: &mut Value, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    match target {
        Value::Object(map) => set_in_map(map, segments, value),
        Value::Array(items) if *first == WILDCARD => {
            for child in items.iter_mut() {
                assign(child, rest, value.clone());
            }
        }
        Value::Array(items) => match array_index(first) {
            Some(index) if index < items.len() => assign(&mut items[index], rest, value),
            Some(index) if index == items.len() => {
                let mut child = match rest.first() {
                    Some(next) => empty_container(next),
                    None => Value::Null,
                };
                assign(&mut child, rest, value);
                items.push(child);
            }
            _ => {
                let map = indexed(std::mem::take(items));
                *target = Value::Object(map);
                set_in_value(target, segments, value);
            }
        },
        _ => {
            *target = empty_container(first);
            set_in_value(target, segments, value);
        }
    }
}

/// Assigns `value` at the remaining `segments` below `target`, or to
/// `target` itself when no segments remain.
fn assign(target: &mut Value, segments: &[&str], value: Value) {
    if segments.is_empty() {
        *target = value;
    } else {
        set_in_value(target, segments, value);
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => items.get_mut(array_index(segment)?),
        _ => None,
    }
}

/// Container to create for a missing intermediate, given the segment that
/// will index into it.
fn empty_container(next: &str) -> Value {
    if next == WILDCARD || array_index(next).is_some() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// Parses a canonical decimal index (no sign, no leading zeros).
fn array_index(segment: &str) -> Option<usize> {
    let index: usize = segment.parse().ok()?;
    (index.to_string() == segment).then_some(index)
}

fn indexed(items: Vec<Value>) -> Map<String, Value> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, value)| (index.to_string(), value))
        .collect()
}
