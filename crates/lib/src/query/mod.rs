//! Query predicates over the paths inside an attribute.
//!
//! An [`AttributeScope`] turns the loose argument shapes callers use to
//! filter records by their JSON attribute (a mapping, a name and a value, or
//! a name, an operator and a value) into predicates on a [`QueryBuilder`].
//! Every predicate path is prefixed with the scope's attribute name.
//!
//! ```rust
//! use schemaless::query::{AttributeScope, Operator, Predicates};
//!
//! let scope = AttributeScope::new("extra_attributes");
//! let predicates = scope.where_op(Predicates::new(), "age", Operator::Gte, 18);
//! let predicates = scope.or_where_eq(predicates, "vip", true);
//!
//! let paths: Vec<&str> = predicates.iter().map(|p| p.path.as_str()).collect();
//! assert_eq!(paths, ["extra_attributes.age", "extra_attributes.vip"]);
//! ```

mod errors;
mod scope;

use std::{fmt, str::FromStr};

use serde::Serialize;
use serde_json::Value;

pub use errors::QueryError;
pub use scope::{AttributeScope, ScopeArgs};

/// How a predicate joins the ones added before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Combine {
    #[default]
    And,
    Or,
}

impl Combine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combine::And => "and",
            Combine::Or => "or",
        }
    }
}

impl fmt::Display for Combine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator of a predicate.
///
/// The set is closed. Spellings outside it (`ilike`, `in`, `between`,
/// database-specific operators) fail to parse with
/// [`QueryError::InvalidOperator`] instead of being passed through to the
/// [`QueryBuilder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "not like")]
    NotLike,
}

impl Operator {
    /// Canonical spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "like",
            Operator::NotLike => "not like",
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    /// Parses an operator, ignoring case and surrounding whitespace.
    /// `<>` is accepted as a spelling of `!=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        match normalized.as_str() {
            "=" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::NotEq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "like" => Ok(Operator::Like),
            "not like" => Ok(Operator::NotLike),
            _ => Err(QueryError::InvalidOperator {
                operator: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives the predicates an [`AttributeScope`] resolves.
///
/// Implement this for whatever query representation the caller uses.
/// Operators arrive as one of the eight [`Operator`] variants; a builder
/// whose backend spells them differently maps them itself, and operators
/// outside the set never reach it.
pub trait QueryBuilder {
    fn add_predicate(&mut self, path: &str, operator: Operator, value: Value, combine: Combine);
}

impl<B: QueryBuilder + ?Sized> QueryBuilder for &mut B {
    fn add_predicate(&mut self, path: &str, operator: Operator, value: Value, combine: Combine) {
        (**self).add_predicate(path, operator, value, combine);
    }
}

/// A single resolved predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub path: String,
    pub operator: Operator,
    pub value: Value,
    pub combine: Combine,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.combine, self.path, self.operator, self.value
        )
    }
}

/// A [`QueryBuilder`] that records predicates in the order they are added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Predicates {
    predicates: Vec<Predicate>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.predicates.iter()
    }

    pub fn as_slice(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn into_vec(self) -> Vec<Predicate> {
        self.predicates
    }
}

impl QueryBuilder for Predicates {
    fn add_predicate(&mut self, path: &str, operator: Operator, value: Value, combine: Combine) {
        self.predicates.push(Predicate {
            path: path.to_string(),
            operator,
            value,
            combine,
        });
    }
}

impl<'a> IntoIterator for &'a Predicates {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.iter()
    }
}

impl IntoIterator for Predicates {
    type Item = Predicate;
    type IntoIter = std::vec::IntoIter<Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.into_iter()
    }
}
