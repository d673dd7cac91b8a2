//! Host records that own the JSON attributes a bag operates on.
//!
//! [`HostRecord`] is the narrow interface a bag needs from the entity whose
//! field it wraps: read the raw stored text, decode JSON, and write a new
//! value. [`Record`] is a small in-memory implementation shaped like a
//! database row, where JSON columns hold encoded text.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::Result;

/// Errors raised by [`Record`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RecordError {
    /// The field is guarded and cannot be written
    #[error("Attribute '{attribute}' is guarded and cannot be written")]
    Guarded { attribute: String },

    /// A record file did not contain a JSON object
    #[error("Record file '{path}' does not contain a JSON object (found {found})")]
    NotAnObject { path: String, found: &'static str },
}

impl RecordError {
    /// Check if this error was caused by writing a guarded attribute
    pub fn is_guarded(&self) -> bool {
        matches!(self, RecordError::Guarded { .. })
    }

    /// Get the attribute name if this is an attribute-specific error
    pub fn attribute(&self) -> Option<&str> {
        match self {
            RecordError::Guarded { attribute } => Some(attribute),
            _ => None,
        }
    }
}

impl From<RecordError> for crate::Error {
    fn from(err: RecordError) -> Self {
        crate::Error::Record(err)
    }
}

/// The entity whose field backs an attribute bag.
///
/// Persistence to any backing store is the implementor's concern; the bag
/// only ever touches the in-memory field.
pub trait HostRecord {
    /// Returns the raw stored text of a field, or `None` if it is absent.
    fn raw_attribute(&self, name: &str) -> Option<String>;

    /// Decodes stored text as JSON. Returns `None` for invalid text.
    fn decode_json(&self, text: &str) -> Option<Value> {
        serde_json::from_str(text).ok()
    }

    /// Stores a plain JSON value as the field's in-memory value.
    ///
    /// # Errors
    /// Implementations may refuse the write; the bag then keeps its previous
    /// state and returns the error to its caller.
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()>;
}

/// An in-memory record with named fields.
///
/// String fields hold raw text exactly as a database column would; any other
/// JSON value is treated as already decoded and is re-encoded when its raw
/// text is requested. Writes through [`HostRecord::set_attribute`] store the
/// JSON encoding of the value as text.
///
/// ```rust
/// use schemaless::{HostRecord, Record};
/// use serde_json::json;
///
/// let mut record = Record::new().with_attribute("meta", r#"{"a":1}"#);
/// assert_eq!(record.raw_attribute("meta").as_deref(), Some(r#"{"a":1}"#));
///
/// record.set_attribute("meta", json!({"b": 2}))?;
/// assert_eq!(record.raw_attribute("meta").as_deref(), Some(r#"{"b":2}"#));
/// # Ok::<(), schemaless::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    attributes: Map<String, Value>,
    /// Fields that reject writes. Not persisted.
    #[serde(skip)]
    guarded: Vec<String>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from decoded field values.
    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            guarded: Vec::new(),
        }
    }

    /// Builder-style helper that sets a field to raw text.
    pub fn with_attribute(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), Value::String(raw.into()));
        self
    }

    /// Marks a field as read-only.
    pub fn guard(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.is_guarded(&name) {
            self.guarded.push(name);
        }
        self
    }

    /// Check if a field rejects writes
    pub fn is_guarded(&self, name: &str) -> bool {
        self.guarded.iter().any(|guarded| guarded == name)
    }

    /// Returns the stored value of a field, without decoding.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns all stored fields.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Loads a record from a JSON file containing a single object.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(attributes) => {
                tracing::debug!(path = %path.display(), fields = attributes.len(), "Loaded record");
                Ok(Self::from_attributes(attributes))
            }
            other => Err(RecordError::NotAnObject {
                path: path.display().to_string(),
                found: crate::tree::kind(&other),
            }
            .into()),
        }
    }

    /// Writes the record to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(&self.attributes)?;
        std::fs::write(path, text)?;
        tracing::debug!(path = %path.display(), "Saved record");
        Ok(())
    }
}

impl HostRecord for Record {
    fn raw_attribute(&self, name: &str) -> Option<String> {
        match self.attributes.get(name)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        if self.is_guarded(name) {
            return Err(RecordError::Guarded {
                attribute: name.to_string(),
            }
            .into());
        }
        let encoded = serde_json::to_string(&value)?;
        self.attributes.insert(name.to_string(), Value::String(encoded));
        Ok(())
    }
}
