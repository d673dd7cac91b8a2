//! Bulk operations forwarded from a bag to a [`Collection`].
//!
//! Each operation runs against a collection built from a copy of the
//! snapshot. The operation's own return value goes back to the caller as-is,
//! and the state the collection is left in is synced as the new snapshot.

use std::cmp::Ordering;

use serde_json::Value;

use crate::{
    Result,
    bag::{AttributeBag, Collection},
    path::Path,
    record::HostRecord,
};

impl<H: HostRecord + ?Sized> AttributeBag<'_, H> {
    /// Runs `op` against a collection over the snapshot, syncs the
    /// collection's resulting state, and returns `op`'s result.
    ///
    /// ```rust
    /// use schemaless::{AttributeBag, Record};
    /// use serde_json::json;
    ///
    /// let mut record = Record::new().with_attribute("meta", r#"{"a":1,"b":2}"#);
    /// let mut bag = AttributeBag::new(&mut record, "meta");
    ///
    /// let had_b = bag.bulk(|items| items.pull("b").is_some())?;
    /// assert!(had_b);
    /// assert_eq!(bag.to_value(), json!({"a": 1}));
    /// # Ok::<(), schemaless::Error>(())
    /// ```
    pub fn bulk<R>(&mut self, op: impl FnOnce(&mut Collection) -> R) -> Result<R> {
        let mut collection = Collection::new(self.to_map());
        let result = op(&mut collection);
        self.replace(collection.into_map())?;
        Ok(result)
    }

    /// Like [`AttributeBag::bulk`] for operations that can fail.
    ///
    /// An error from `op` is returned unchanged and leaves the snapshot and
    /// the host untouched.
    pub fn try_bulk<R, E>(&mut self, op: impl FnOnce(&mut Collection) -> std::result::Result<R, E>) -> std::result::Result<R, E>
    where
        E: From<crate::Error>,
    {
        let mut collection = Collection::new(self.to_map());
        let result = op(&mut collection)?;
        self.replace(collection.into_map())?;
        Ok(result)
    }

    /// Keeps the entries matching `keep`. Returns how many were removed.
    pub fn filter<F>(&mut self, keep: F) -> Result<usize>
    where
        F: FnMut(&str, &Value) -> bool,
    {
        self.bulk(|items| items.filter(keep))
    }

    /// Removes the entries matching `drop`. Returns how many were removed.
    pub fn reject<F>(&mut self, drop: F) -> Result<usize>
    where
        F: FnMut(&str, &Value) -> bool,
    {
        self.bulk(|items| items.reject(drop))
    }

    pub fn map<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&str, Value) -> Value,
    {
        self.bulk(|items| items.map(f))
    }

    /// Replaces each top-level value with the value at `path` inside it.
    pub fn pluck(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.bulk(|items| items.pluck(path))
    }

    pub fn sort_by<F>(&mut self, compare: F) -> Result<()>
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        self.bulk(|items| items.sort_by(compare))
    }

    pub fn sort_keys(&mut self) -> Result<()> {
        self.bulk(Collection::sort_keys)
    }

    /// Keeps the first `limit` entries (the last `-limit` when negative).
    pub fn take(&mut self, limit: isize) -> Result<usize> {
        self.bulk(|items| items.take(limit))
    }

    pub fn only<I, K>(&mut self, keys: I) -> Result<usize>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.bulk(|items| items.only(keys))
    }

    pub fn except<I, K>(&mut self, keys: I) -> Result<usize>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.bulk(|items| items.except(keys))
    }

    /// Sets a top-level key without path interpretation.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<Value>> {
        self.bulk(|items| items.put(key, value))
    }

    pub fn pull(&mut self, key: &str) -> Result<Option<Value>> {
        self.bulk(|items| items.pull(key))
    }

    pub fn push(&mut self, value: impl Into<Value>) -> Result<String> {
        self.bulk(|items| items.push(value))
    }

    pub fn prepend(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.bulk(|items| items.prepend(key, value))
    }

    pub fn pop(&mut self) -> Result<Option<(String, Value)>> {
        self.bulk(Collection::pop)
    }

    pub fn shift(&mut self) -> Result<Option<(String, Value)>> {
        self.bulk(Collection::shift)
    }
}
