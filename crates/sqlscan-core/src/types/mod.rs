//! Literal value types

use serde::{Deserialize, Serialize};

/// A literal value attached to a column or an inserted row
///
/// Serialized untagged, so `Null` becomes JSON `null` while an absent value
/// (`Option::None` on the owner) is omitted entirely. Dates and strings share
/// a JSON representation, so this type is not deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Boolean(bool),
    Number(i64),
    /// RFC 3339 string, kept verbatim
    Date(String),
    String(String),
    Null,
}

impl SqlValue {
    /// The type tag reported alongside this value
    pub fn ts_type(&self) -> TsType {
        match self {
            SqlValue::Boolean(_) => TsType::Boolean,
            SqlValue::Number(_) => TsType::Number,
            SqlValue::Date(_) => TsType::Date,
            SqlValue::String(_) => TsType::String,
            SqlValue::Null => TsType::Null,
        }
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Boolean(b) => write!(f, "{}", b),
            SqlValue::Number(n) => write!(f, "{}", n),
            SqlValue::Date(s) | SqlValue::String(s) => write!(f, "'{}'", s),
            SqlValue::Null => write!(f, "NULL"),
        }
    }
}

/// Type tag of a literal, named after the TypeScript type it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TsType {
    String,
    Number,
    Boolean,
    Null,
    Date,
}

impl TsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TsType::String => "string",
            TsType::Number => "number",
            TsType::Boolean => "boolean",
            TsType::Null => "null",
            TsType::Date => "date",
        }
    }
}

impl std::fmt::Display for TsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a column's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InType {
    /// Declared in an INSERT column list
    List,
    /// Constrained by a WHERE/ON comparison
    Expression,
}

impl std::fmt::Display for InType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InType::List => write!(f, "list"),
            InType::Expression => write!(f, "expression"),
        }
    }
}
