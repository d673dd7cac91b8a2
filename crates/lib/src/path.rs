//! Dot-delimited paths into a bag's snapshot.
//!
//! Any string is a valid path: empty segments are ignored when walking, so
//! `"user..name"`, `".user.name."` and `"user.name"` all address the same
//! location.
//!
//! # Usage
//!
//! ```rust
//! use schemaless::path::Path;
//!
//! let path = Path::new("..user.profile.name");
//! assert_eq!(path.components().collect::<Vec<_>>(), ["user", "profile", "name"]);
//! assert_eq!(path.as_str(), "..user.profile.name");
//! assert!(Path::new("...").is_empty());
//! ```

use std::fmt;

use thiserror::Error;

/// Segment that matches every child of the value it is applied to.
pub const WILDCARD: &str = "*";

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Error type for path validation failures.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The path has no segments but the operation needs a target location.
    #[error("Empty path is not allowed for {operation}")]
    Empty { operation: String },
}

impl PathError {
    /// Check if this error was caused by an empty path
    pub fn is_empty_path(&self) -> bool {
        matches!(self, PathError::Empty { .. })
    }
}

impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}

/// A borrowed path.
///
/// This type is unsized and must always be used behind a reference.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

impl Path {
    /// Borrows a string as a path. No normalization is performed; empty
    /// segments are skipped when the path is walked.
    pub fn new(s: &str) -> &Path {
        // SAFETY: Path is a repr(transparent) wrapper around str
        unsafe { &*(s as *const str as *const Path) }
    }

    /// Returns an iterator over the non-empty segments.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.components().next().is_none()
    }

    /// Returns the path as a string slice, exactly as it was given.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for str {
    fn as_ref(&self) -> &Path {
        Path::new(self)
    }
}

impl AsRef<Path> for String {
    fn as_ref(&self) -> &Path {
        Path::new(self)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "(empty path)")
        } else {
            write!(f, "{}", &self.inner)
        }
    }
}
