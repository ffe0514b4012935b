//! Response format selector.

use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// The two representations the API can return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// Structured JSON pages with `count`, `npages` and `out`.
    #[default]
    Json,
    /// Concatenated text blocks, each starting with a `data_` line.
    Cif,
}

impl Format {
    /// The value sent in the `fmt` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Cif => "cif",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "cif" => Ok(Self::Cif),
            other => Err(QueryError::UnsupportedFormat(other.to_string())),
        }
    }
}
