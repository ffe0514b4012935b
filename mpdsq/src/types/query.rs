//! Query filters.
//!
//! A `Query` is a flat mapping from filter name to a string or integer value,
//! for example `{"elements": "Ti-O", "sgs": 136}`. The client never interprets
//! filter names; the mapping is sent as-is in the `q` parameter.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::QueryError;

/// A single filter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    String(String),
    Integer(i64),
}

impl QueryValue {
    fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.to_owned()),
            Self::Integer(n) => Value::from(*n),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for QueryValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

/// A set of filters sent to the API.
///
/// Filter names are unique; inserting an existing name replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query {
    filters: BTreeMap<String, QueryValue>,
}

impl Query {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, consuming and returning the query.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a filter, returning the value it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Option<QueryValue> {
        self.filters.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.filters.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a query from an untyped JSON document.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::InvalidQuery` if the document is not an object, or
    /// if any value is neither a string nor an integer.
    pub fn from_value(value: Value) -> Result<Self, QueryError> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(QueryError::InvalidQuery(format!(
                    "query should be a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        let mut query = Self::new();
        for (key, value) in object {
            let value = match value {
                Value::String(s) => QueryValue::String(s),
                Value::Number(n) => n.as_i64().map(QueryValue::Integer).ok_or_else(|| {
                    QueryError::InvalidQuery(format!("filter '{key}' must be an integer, got {n}"))
                })?,
                other => {
                    return Err(QueryError::InvalidQuery(format!(
                        "filter '{key}' must be a string or an integer, got {}",
                        json_kind(&other)
                    )));
                }
            };
            query.filters.insert(key, value);
        }

        Ok(query)
    }

    /// Serialize the filters into the `q` wire parameter.
    #[must_use]
    pub fn to_json(&self) -> String {
        let object: serde_json::Map<String, Value> = self
            .filters
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_json()))
            .collect();
        Value::Object(object).to_string()
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
