//!
//! Schemaless: path-addressable JSON attributes for record-like entities.
//!
//! A single JSON field of a record can hold arbitrary nested data without a
//! fixed schema. This library reads, writes and queries that data by dotted
//! paths while keeping the record field in sync with every change.
//!
//! ## Core Concepts
//!
//! * **Paths (`path::Path`)**: Dot-delimited addresses such as `"address.city"` or `"tags.*"`.
//! * **Trees (`tree`)**: Free functions that get, set, forget and merge by path inside a JSON object.
//! * **Host records (`record::HostRecord`)**: The entity owning the JSON field. `record::Record` is an in-memory implementation that can be loaded from and saved to a file.
//! * **Attribute bags (`bag::AttributeBag`)**: A decoded snapshot of one field, written back to the host after every mutation.
//! * **Collections (`bag::Collection`)**: The ordered container bulk operations run against; their result state becomes the bag's new snapshot.
//! * **Scopes (`query::AttributeScope`)**: Turn loosely shaped filter arguments into predicates on a caller-supplied query builder.

pub mod bag;
pub mod path;
pub mod query;
pub mod record;
pub mod tree;

pub use bag::{AttributeBag, Collection, JsonFormat};
pub use path::Path;
pub use query::{AttributeScope, Combine, Operator, Predicates, QueryBuilder, ScopeArgs};
pub use record::{HostRecord, Record};

/// Result type used throughout the Schemaless library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Schemaless library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured path errors from the path module
    #[error(transparent)]
    Path(path::PathError),

    /// Structured tree errors from the tree module
    #[error(transparent)]
    Tree(tree::TreeError),

    /// Structured bag errors from the bag module
    #[error(transparent)]
    Bag(bag::BagError),

    /// Structured host record errors from the record module
    #[error(transparent)]
    Record(record::RecordError),

    /// Structured predicate errors from the query module
    #[error(transparent)]
    Query(query::QueryError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Path(_) => "path",
            Error::Tree(_) => "tree",
            Error::Bag(_) => "bag",
            Error::Record(_) => "record",
            Error::Query(_) => "query",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error was caused by an unusable path.
    pub fn is_path_error(&self) -> bool {
        matches!(self, Error::Path(_))
    }

    /// Check if this error was caused by a value of the wrong shape.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Tree(tree_err) => tree_err.is_not_iterable(),
            Error::Bag(bag_err) => bag_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error indicates the host refused a write.
    pub fn is_rejected_write(&self) -> bool {
        match self {
            Error::Record(record_err) => record_err.is_guarded(),
            _ => false,
        }
    }

    /// Check if this error came from resolving query arguments.
    pub fn is_query_error(&self) -> bool {
        matches!(self, Error::Query(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error is serialization-related.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
