use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::{path::Path, tree};

/// Ordered key/value container that bulk operations run against.
///
/// Operations rewrite the collection in place and return their own result,
/// which is unrelated to the state they leave behind. When a collection is
/// driven through [`AttributeBag::bulk`](crate::AttributeBag::bulk), that
/// state becomes the bag's new snapshot.
///
/// ```rust
/// use schemaless::bag::Collection;
/// use serde_json::json;
///
/// let mut collection = Collection::from_value(json!({"a": 1, "b": 2, "c": 3})).unwrap();
/// let removed = collection.filter(|_, value| value.as_i64() != Some(2));
/// assert_eq!(removed, 1);
/// assert_eq!(collection.into_value(), json!({"a": 1, "c": 3}));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    items: Map<String, Value>,
}

impl Collection {
    pub fn new(items: Map<String, Value>) -> Self {
        Self { items }
    }

    /// Builds a collection from an object or array. Returns `None` for
    /// scalars.
    pub fn from_value(value: Value) -> Option<Self> {
        tree::into_map(value).map(Self::new)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.items
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.items)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.items.values().cloned().collect()
    }

    pub fn first(&self) -> Option<(&String, &Value)> {
        self.items.iter().next()
    }

    pub fn last(&self) -> Option<(&String, &Value)> {
        self.items.iter().next_back()
    }

    /// Check if any entry holds `value`.
    pub fn contains(&self, value: &Value) -> bool {
        self.items.values().any(|item| item == value)
    }

    /// Keeps the entries matching `keep`. Returns how many were removed.
    pub fn filter<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str, &Value) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|key, value| keep(key, value));
        before - self.items.len()
    }

    /// Removes the entries matching `drop`. Returns how many were removed.
    pub fn reject<F>(&mut self, mut drop: F) -> usize
    where
        F: FnMut(&str, &Value) -> bool,
    {
        self.filter(|key, value| !drop(key, value))
    }

    /// Replaces every value with the result of `f`.
    pub fn map<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, Value) -> Value,
    {
        self.items = std::mem::take(&mut self.items)
            .into_iter()
            .map(|(key, value)| {
                let mapped = f(&key, value);
                (key, mapped)
            })
            .collect();
    }

    /// Like [`Collection::map`] for closures that only need the value.
    pub fn transform<F>(&mut self, mut f: F)
    where
        F: FnMut(Value) -> Value,
    {
        self.map(|_, value| f(value));
    }

    /// Replaces every value with the value found at `path` inside it
    /// (`null` where the path is missing). Returns how many entries had it.
    pub fn pluck(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let mut found = 0;
        self.map(|_, value| {
            let plucked = tree::into_map(value).and_then(|item| tree::get(&item, path));
            if plucked.is_some() {
                found += 1;
            }
            plucked.unwrap_or(Value::Null)
        });
        found
    }

    /// Stable sort of the entries by value.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        self.reorder(|entries| entries.sort_by(|a, b| compare(&a.1, &b.1)));
    }

    /// Stable sort of the entries by a key extracted from each value.
    pub fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(&Value) -> K,
    {
        self.reorder(|entries| entries.sort_by_key(|entry| key(&entry.1)));
    }

    /// Sorts the entries by key.
    pub fn sort_keys(&mut self) {
        self.reorder(|entries| entries.sort_by(|a, b| a.0.cmp(&b.0)));
    }

    /// Keeps the first `limit` entries, or the last `-limit` entries when
    /// `limit` is negative. Returns how many were removed.
    pub fn take(&mut self, limit: isize) -> usize {
        let len = self.items.len();
        let keep = limit.unsigned_abs().min(len);
        let skip = if limit < 0 { len - keep } else { 0 };
        self.items = std::mem::take(&mut self.items)
            .into_iter()
            .skip(skip)
            .take(keep)
            .collect();
        len - keep
    }

    /// Keeps only the listed keys. Returns how many entries were removed.
    pub fn only<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        self.filter(|key, _| keys.iter().any(|wanted| wanted.as_ref() == key))
    }

    /// Removes the listed keys. Returns how many entries were removed.
    pub fn except<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter()
            .filter(|key| self.items.shift_remove(key.as_ref()).is_some())
            .count()
    }

    /// Inserts or overwrites `key`. Returns the previous value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.items.insert(key.into(), value.into())
    }

    /// Removes `key` and returns its value.
    pub fn pull(&mut self, key: &str) -> Option<Value> {
        self.items.shift_remove(key)
    }

    /// Appends `value` under the next free integer key and returns that key.
    pub fn push(&mut self, value: impl Into<Value>) -> String {
        let next = self
            .items
            .keys()
            .filter_map(|key| key.parse::<u64>().ok())
            .max()
            .map_or(0, |max| max + 1);
        let key = next.to_string();
        self.items.insert(key.clone(), value.into());
        key
    }

    /// Inserts `key` at the front, replacing any existing entry with that key.
    pub fn prepend(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.items.shift_remove(&key);
        let mut items = Map::with_capacity(self.items.len() + 1);
        items.insert(key, value.into());
        items.extend(std::mem::take(&mut self.items));
        self.items = items;
    }

    /// Removes and returns the last entry.
    pub fn pop(&mut self) -> Option<(String, Value)> {
        let key = self.items.keys().next_back()?.clone();
        let value = self.items.shift_remove(&key)?;
        Some((key, value))
    }

    /// Removes and returns the first entry.
    pub fn shift(&mut self) -> Option<(String, Value)> {
        let key = self.items.keys().next()?.clone();
        let value = self.items.shift_remove(&key)?;
        Some((key, value))
    }

    fn reorder(&mut self, sort: impl FnOnce(&mut Vec<(String, Value)>)) {
        let mut entries: Vec<(String, Value)> = std::mem::take(&mut self.items).into_iter().collect();
        sort(&mut entries);
        self.items = entries.into_iter().collect();
    }
}

impl From<Map<String, Value>> for Collection {
    fn from(items: Map<String, Value>) -> Self {
        Self::new(items)
    }
}
