//! Error types for attribute bag operations.

use thiserror::Error;

/// Errors raised by [`AttributeBag`](super::AttributeBag) itself.
///
/// Path, tree, and host failures keep their own error types and pass through
/// the bag unchanged.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BagError {
    /// A stored value could not be converted to the requested type
    #[error("Type mismatch at '{path}' in attribute '{attribute}': {reason}")]
    TypeMismatch {
        attribute: String,
        path: String,
        reason: String,
    },
}

impl BagError {
    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, BagError::TypeMismatch { .. })
    }

    /// Get the source attribute name associated with this error
    pub fn attribute(&self) -> &str {
        match self {
            BagError::TypeMismatch { attribute, .. } => attribute,
        }
    }

    /// Get the path if this is a path-related error
    pub fn path(&self) -> Option<&str> {
        match self {
            BagError::TypeMismatch { path, .. } => Some(path),
        }
    }
}

impl From<BagError> for crate::Error {
    fn from(err: BagError) -> Self {
        crate::Error::Bag(err)
    }
}
