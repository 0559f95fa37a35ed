//! Extraction result model

mod kind;

use serde::Serialize;

use crate::error::SyntaxErrorInfo;
use crate::types::{InType, SqlValue, TsType};

pub use kind::StatementKind;

/// Result of parsing a (possibly multi-statement) query
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseResult {
    /// Statements parsed before the first failure, in input order
    pub statements: Vec<Statement>,
    /// First syntax error, positioned against the original input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SyntaxErrorInfo>,
}

impl ParseResult {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A single parsed statement
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    #[serde(rename = "type")]
    pub kind: StatementKind,
    pub tables: Vec<Table>,
    /// The parser's AST, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<sqlparser::ast::Statement>,
}

/// A table referenced by a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Sorted by name
    pub columns: Vec<Column>,
    /// Inserted rows (INSERT statements only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A column of a table, with any literal constraint attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SqlValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_type: Option<TsType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_type: Option<InType>,
}

impl Column {
    /// A column that is merely referenced
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            ts_type: None,
            operator: None,
            in_type: None,
        }
    }
}

/// One inserted row, one entry per column-list position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row {
    pub values: Vec<RowValue>,
}

/// A classified value in an inserted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SqlValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_type: Option<TsType>,
}

impl From<Option<SqlValue>> for RowValue {
    fn from(value: Option<SqlValue>) -> Self {
        let ts_type = value.as_ref().map(SqlValue::ts_type);
        Self { value, ts_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_serialization_omits_absent_fields() {
        let column = Column::new("id");
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "id" }));
    }

    #[test]
    fn test_column_serialization_keeps_null_value() {
        let column = Column {
            name: "version".into(),
            value: Some(SqlValue::Null),
            ts_type: Some(TsType::Null),
            operator: Some("=".into()),
            in_type: Some(InType::Expression),
        };
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "version",
                "value": null,
                "tsType": "null",
                "operator": "=",
                "inType": "expression"
            })
        );
    }

    #[test]
    fn test_table_serialization() {
        let mut table = Table::new("allowed_labels");
        table.rows.push(Row {
            values: vec![
                RowValue::from(Some(SqlValue::String("some-id".into()))),
                RowValue::from(Some(SqlValue::Number(123))),
            ],
        });
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "allowed_labels",
                "columns": [],
                "rows": [[
                    { "value": "some-id", "tsType": "string" },
                    { "value": 123, "tsType": "number" }
                ]]
            })
        );
    }

    #[test]
    fn test_lookup_helpers() {
        let mut table = Table::new("workspaces").with_alias("w");
        table.columns.push(Column::new("id"));
        assert_eq!(table.alias.as_deref(), Some("w"));
        assert!(table.column("id").is_some());
        assert!(table.column("slug").is_none());
    }
}
