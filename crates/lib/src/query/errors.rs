//! Error types for predicate resolution.

use thiserror::Error;

/// Errors raised while resolving predicate arguments.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A lone argument must be a mapping of path to value
    #[error("Expected a mapping of paths to values, found {found}")]
    NotAMapping { found: &'static str },

    /// A predicate name must be a string
    #[error("Predicate name must be a string, found {found}")]
    InvalidName { found: &'static str },

    /// The comparison operator is not supported
    #[error("Unsupported comparison operator: {operator}")]
    InvalidOperator { operator: String },
}

impl QueryError {
    /// Check if this error was caused by the shape of the arguments
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            QueryError::NotAMapping { .. } | QueryError::InvalidName { .. }
        )
    }

    /// Check if this error was caused by an unknown operator
    pub fn is_operator_error(&self) -> bool {
        matches!(self, QueryError::InvalidOperator { .. })
    }
}

impl From<QueryError> for crate::Error {
    fn from(err: QueryError) -> Self {
        crate::Error::Query(err)
    }
}
