use serde_json::{Map, Value};

use super::{Combine, Operator, QueryBuilder, QueryError};
use crate::tree;

/// The argument shapes a scoped query accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeArgs {
    /// No constraint.
    None,
    /// One equality predicate per entry, in map order.
    Map(Map<String, Value>),
    /// A single equality predicate.
    Equals { name: String, value: Value },
    /// A single predicate with an explicit operator.
    Compare {
        name: String,
        operator: Operator,
        value: Value,
    },
}

impl ScopeArgs {
    pub fn map<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        ScopeArgs::Map(
            items
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    pub fn equals(name: impl Into<String>, value: impl Into<Value>) -> Self {
        ScopeArgs::Equals {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn compare(name: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        ScopeArgs::Compare {
            name: name.into(),
            operator,
            value: value.into(),
        }
    }

    /// Resolves a loosely typed argument list.
    ///
    /// - no arguments: [`ScopeArgs::None`]
    /// - one argument: must be an object, resolved to [`ScopeArgs::Map`]
    /// - two arguments: name and value
    /// - three or more: name, operator and value; the rest are ignored
    ///
    /// # Errors
    /// [`QueryError::NotAMapping`] for a lone non-object argument,
    /// [`QueryError::InvalidName`] for a non-string name and
    /// [`QueryError::InvalidOperator`] for an operator that is not a known
    /// operator string.
    pub fn from_values(args: &[Value]) -> Result<Self, QueryError> {
        match args {
            [] => Ok(ScopeArgs::None),
            [Value::Object(items)] => Ok(ScopeArgs::Map(items.clone())),
            [other] => Err(QueryError::NotAMapping {
                found: tree::kind(other),
            }),
            [name, value] => Ok(ScopeArgs::Equals {
                name: name_of(name)?,
                value: value.clone(),
            }),
            [name, operator, value, ..] => Ok(ScopeArgs::Compare {
                name: name_of(name)?,
                operator: operator_of(operator)?,
                value: value.clone(),
            }),
        }
    }

    /// The `(name, operator, value)` triples these arguments stand for.
    pub fn into_triples(self) -> Vec<(String, Operator, Value)> {
        match self {
            ScopeArgs::None => Vec::new(),
            ScopeArgs::Map(items) => items
                .into_iter()
                .map(|(name, value)| (name, Operator::Eq, value))
                .collect(),
            ScopeArgs::Equals { name, value } => vec![(name, Operator::Eq, value)],
            ScopeArgs::Compare {
                name,
                operator,
                value,
            } => vec![(name, operator, value)],
        }
    }
}

fn name_of(value: &Value) -> Result<String, QueryError> {
    match value {
        Value::String(name) => Ok(name.clone()),
        other => Err(QueryError::InvalidName {
            found: tree::kind(other),
        }),
    }
}

fn operator_of(value: &Value) -> Result<Operator, QueryError> {
    match value {
        Value::String(operator) => operator.parse(),
        other => Err(QueryError::InvalidOperator {
            operator: other.to_string(),
        }),
    }
}

/// Builds predicates on the paths inside one attribute.
///
/// Every entry point takes the builder by value and hands it back, so calls
/// chain. Pass `&mut builder` to keep ownership instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeScope {
    attribute: String,
}

impl AttributeScope {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The predicate path for `name`: `"{attribute}.{name}"`.
    pub fn path_for(&self, name: &str) -> String {
        format!("{}.{}", self.attribute, name)
    }

    /// Adds the predicates `args` resolve to, joined with `combine`.
    pub fn apply<B: QueryBuilder>(&self, mut builder: B, args: ScopeArgs, combine: Combine) -> B {
        let triples = args.into_triples();
        tracing::debug!(
            attribute = %self.attribute,
            predicates = triples.len(),
            combine = %combine,
            "Resolved scope arguments"
        );
        for (name, operator, value) in triples {
            builder.add_predicate(&self.path_for(&name), operator, value, combine);
        }
        builder
    }

    /// Adds nothing.
    pub fn where_all<B: QueryBuilder>(&self, builder: B) -> B {
        self.apply(builder, ScopeArgs::None, Combine::And)
    }

    /// One `=` predicate per entry, joined with AND.
    pub fn where_map<B, I, K, V>(&self, builder: B, items: I) -> B
    where
        B: QueryBuilder,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.apply(builder, ScopeArgs::map(items), Combine::And)
    }

    pub fn where_eq<B: QueryBuilder>(&self, builder: B, name: &str, value: impl Into<Value>) -> B {
        self.apply(builder, ScopeArgs::equals(name, value), Combine::And)
    }

    pub fn where_op<B: QueryBuilder>(
        &self,
        builder: B,
        name: &str,
        operator: Operator,
        value: impl Into<Value>,
    ) -> B {
        self.apply(builder, ScopeArgs::compare(name, operator, value), Combine::And)
    }

    /// One `=` predicate per entry, each joined with OR.
    pub fn or_where_map<B, I, K, V>(&self, builder: B, items: I) -> B
    where
        B: QueryBuilder,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.apply(builder, ScopeArgs::map(items), Combine::Or)
    }

    pub fn or_where_eq<B: QueryBuilder>(&self, builder: B, name: &str, value: impl Into<Value>) -> B {
        self.apply(builder, ScopeArgs::equals(name, value), Combine::Or)
    }

    pub fn or_where_op<B: QueryBuilder>(
        &self,
        builder: B,
        name: &str,
        operator: Operator,
        value: impl Into<Value>,
    ) -> B {
        self.apply(builder, ScopeArgs::compare(name, operator, value), Combine::Or)
    }
}
