//! Result records.

use std::fmt;

use serde_json::Value;

/// A text line starting with this prefix opens a new text block.
pub const SENTINEL_PREFIX: &str = "data_";

/// A text block whose first line starts with this prefix reports an error.
pub const ERROR_SENTINEL_PREFIX: &str = "data_error";

/// The `object_type` tag of a JSON record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// Tag `S`.
    Structure,
    /// Tag `P`.
    Property,
    /// Any other tag.
    Other(String),
}

impl ObjectType {
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "S" => Self::Structure,
            "P" => Self::Property,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Structure => "S",
            Self::Property => "P",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// One result entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// One element of a JSON page's `out` array.
    Json(Value),
    /// One text block; its first line is the `data_` sentinel line.
    Cif(String),
}

impl Record {
    /// The record's `object_type` tag.
    ///
    /// `None` for text blocks, for JSON entries that are not objects, and for
    /// objects without a string `object_type` field.
    #[must_use]
    pub fn object_type(&self) -> Option<ObjectType> {
        match self {
            Self::Json(value) => value
                .get("object_type")
                .and_then(Value::as_str)
                .map(ObjectType::from_tag),
            Self::Cif(_) => None,
        }
    }

    /// Whether this is a text block reporting an error.
    #[must_use]
    pub fn is_error_block(&self) -> bool {
        matches!(self, Self::Cif(text) if text.starts_with(ERROR_SENTINEL_PREFIX))
    }

    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Cif(_) => None,
        }
    }

    #[must_use]
    pub fn as_cif(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Cif(text) => Some(text),
        }
    }

    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Cif(_) => None,
        }
    }

    #[must_use]
    pub fn into_cif(self) -> Option<String> {
        match self {
            Self::Json(_) => None,
            Self::Cif(text) => Some(text),
        }
    }
}
