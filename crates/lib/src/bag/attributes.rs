use std::{fmt, ops::Index};

use serde::{Serialize, Serializer, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    Result,
    bag::BagError,
    path::Path,
    query::AttributeScope,
    record::HostRecord,
    tree,
};

static NULL: Value = Value::Null;

/// Output style for [`AttributeBag::to_json_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    #[default]
    Compact,
    Pretty,
}

/// A path-addressable view over one JSON field of a host record.
///
/// The bag holds a decoded snapshot of the field and a mutable borrow of the
/// host. Reads are served from the snapshot. Every mutation builds a new
/// snapshot from a copy of the current one, writes it into the host field,
/// and only then installs it, so the snapshot and the host field always hold
/// the same value. If the host refuses the write, the bag keeps its previous
/// snapshot and returns the host's error.
///
/// # Examples
///
/// ```rust
/// use schemaless::{AttributeBag, HostRecord, Record};
/// use serde_json::json;
///
/// let mut record = Record::new().with_attribute("extra_attributes", r#"{"name":"ada"}"#);
/// let mut bag = AttributeBag::new(&mut record, "extra_attributes");
///
/// bag.set("address.city", "London")?.set("address.zip", "N1")?;
/// assert_eq!(bag.get("name"), Some(json!("ada")));
/// assert_eq!(bag.get_or("missing", "fallback"), json!("fallback"));
///
/// assert_eq!(
///     record.raw_attribute("extra_attributes").as_deref(),
///     Some(r#"{"name":"ada","address":{"city":"London","zip":"N1"}}"#)
/// );
/// # Ok::<(), schemaless::Error>(())
/// ```
pub struct AttributeBag<'a, H: HostRecord + ?Sized> {
    host: &'a mut H,
    attribute: String,
    items: Map<String, Value>,
}

impl<'a, H: HostRecord + ?Sized> AttributeBag<'a, H> {
    /// Wraps `attribute` of `host`.
    ///
    /// A missing field, invalid JSON, or a scalar value all start the bag
    /// empty. A top-level JSON array is keyed by its indices.
    pub fn new(host: &'a mut H, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        let items = decode_source(&*host, &attribute);
        Self {
            host,
            attribute,
            items,
        }
    }

    /// Alias for [`AttributeBag::new`].
    pub fn for_record(host: &'a mut H, attribute: impl Into<String>) -> Self {
        Self::new(host, attribute)
    }

    /// Name of the host field backing this bag.
    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    /// Shared view of the host record.
    pub fn host(&self) -> &H {
        &*self.host
    }

    /// Gets a copy of the value at `path`, expanding wildcards.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Value> {
        tree::get(&self.items, path)
    }

    /// Gets the value at `path`, or `default` when it is missing.
    pub fn get_or(&self, path: impl AsRef<Path>, default: impl Into<Value>) -> Value {
        tree::get_or(&self.items, path, default)
    }

    /// Borrows the value at `path` without expanding wildcards.
    pub fn get_ref(&self, path: impl AsRef<Path>) -> Option<&Value> {
        tree::get_ref(&self.items, path)
    }

    /// Gets the value at `path` deserialized into `T`.
    ///
    /// Returns `Ok(None)` when the path is missing.
    ///
    /// # Errors
    /// Returns [`BagError::TypeMismatch`] if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<Option<T>> {
        let path = path.as_ref();
        let Some(value) = self.get(path) else {
            return Ok(None);
        };
        serde_json::from_value(value).map(Some).map_err(|err| {
            BagError::TypeMismatch {
                attribute: self.attribute.clone(),
                path: path.to_string(),
                reason: err.to_string(),
            }
            .into()
        })
    }

    /// Sets `value` at `path` and syncs the host.
    ///
    /// # Errors
    /// Fails on an empty path or when the host rejects the write; the bag is
    /// unchanged in both cases.
    pub fn set(&mut self, path: impl AsRef<Path>, value: impl Into<Value>) -> Result<&mut Self> {
        let mut items = self.items.clone();
        tree::set(&mut items, path, value)?;
        self.replace(items)
    }

    /// Shallow-merges an object (or an array, keyed by index) into the top
    /// level and syncs the host.
    ///
    /// # Errors
    /// Fails with [`TreeError::NotIterable`](crate::tree::TreeError) for
    /// scalar or `null` sources.
    pub fn merge(&mut self, items: impl Into<Value>) -> Result<&mut Self> {
        let mut merged = self.items.clone();
        tree::merge(&mut merged, items.into())?;
        self.replace(merged)
    }

    /// Removes the value at `path` and syncs the host. Missing paths are
    /// not an error.
    pub fn forget(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        self.forget_many([path])
    }

    /// Removes every path in `paths`, then syncs the host once.
    pub fn forget_many<I, P>(&mut self, paths: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut items = self.items.clone();
        for path in paths {
            tree::forget(&mut items, path);
        }
        self.replace(items)
    }

    /// Removes everything and syncs the host.
    pub fn clear(&mut self) -> Result<&mut Self> {
        self.replace(Map::new())
    }

    /// Re-reads the host field, discarding the current snapshot.
    pub fn reload(&mut self) -> &mut Self {
        self.items = decode_source(&*self.host, &self.attribute);
        self
    }

    /// Check if a top-level key exists. Dots are not treated as separators.
    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Check if the value at `path` exists and is not `null`.
    pub fn is_set(&self, path: impl AsRef<Path>) -> bool {
        !matches!(self.get(path), None | Some(Value::Null))
    }

    /// Check if the value at `path` is missing or blank (see [`tree::is_blank`]).
    pub fn is_blank(&self, path: impl AsRef<Path>) -> bool {
        self.get(path).is_none_or(|value| tree::is_blank(&value))
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Alias for [`AttributeBag::len`].
    pub fn count(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the top-level entries in order.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.items.iter()
    }

    pub fn keys(&self) -> serde_json::map::Keys<'_> {
        self.items.keys()
    }

    pub fn values(&self) -> serde_json::map::Values<'_> {
        self.items.values()
    }

    /// Borrows the current snapshot.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.items
    }

    /// Exports the snapshot as a plain map.
    pub fn to_map(&self) -> Map<String, Value> {
        self.items.clone()
    }

    /// Exports the snapshot as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.items.clone())
    }

    /// Encodes the snapshot as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        self.to_json_with(JsonFormat::Compact)
    }

    /// Encodes the snapshot as JSON in the given format.
    pub fn to_json_with(&self, format: JsonFormat) -> Result<String> {
        let text = match format {
            JsonFormat::Compact => serde_json::to_string(&self.items)?,
            JsonFormat::Pretty => serde_json::to_string_pretty(&self.items)?,
        };
        Ok(text)
    }

    /// Predicate builder scoped to this bag's attribute.
    pub fn scope(&self) -> AttributeScope {
        AttributeScope::new(self.attribute.clone())
    }

    /// Installs `items` as the new snapshot after writing it to the host.
    pub(crate) fn replace(&mut self, items: Map<String, Value>) -> Result<&mut Self> {
        if let Err(err) = self
            .host
            .set_attribute(&self.attribute, Value::Object(items.clone()))
        {
            tracing::debug!(attribute = %self.attribute, error = %err, "Host rejected attribute write");
            return Err(err);
        }
        tracing::trace!(attribute = %self.attribute, keys = items.len(), "Synced attribute");
        self.items = items;
        Ok(self)
    }
}

fn decode_source<H: HostRecord + ?Sized>(host: &H, attribute: &str) -> Map<String, Value> {
    let Some(raw) = host.raw_attribute(attribute) else {
        return Map::new();
    };
    match host.decode_json(&raw).and_then(tree::into_map) {
        Some(items) => items,
        None => {
            tracing::debug!(
                attribute = attribute,
                "Source attribute is not a JSON object or array, starting empty"
            );
            Map::new()
        }
    }
}

impl<H: HostRecord + ?Sized> Index<&str> for AttributeBag<'_, H> {
    type Output = Value;

    /// Path lookup returning `Value::Null` for missing paths.
    ///
    /// Indexing borrows from the snapshot, so `*` is matched as a literal key
    /// and never fans out: `bag["users.*.name"]` is `Value::Null` unless a key
    /// named `*` exists. Use [`AttributeBag::get`] for wildcard paths.
    fn index(&self, path: &str) -> &Value {
        self.get_ref(path).unwrap_or(&NULL)
    }
}

impl<'b, H: HostRecord + ?Sized> IntoIterator for &'b AttributeBag<'_, H> {
    type Item = (&'b String, &'b Value);
    type IntoIter = serde_json::map::Iter<'b>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<H: HostRecord + ?Sized> Serialize for AttributeBag<'_, H> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.items.serialize(serializer)
    }
}

impl<H: HostRecord + ?Sized> fmt::Display for AttributeBag<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.items).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl<H: HostRecord + ?Sized> fmt::Debug for AttributeBag<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeBag")
            .field("attribute", &self.attribute)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}
