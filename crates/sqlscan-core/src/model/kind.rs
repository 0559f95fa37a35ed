//! Statement kind preview

use serde::Serialize;
use sqlparser::ast::Statement;

/// Coarse classification of a parsed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
    Ddl,
    Set,
    Show,
    Use,
    Begin,
    Commit,
    Rollback,
    Explain,
    Other,
}

impl StatementKind {
    /// Classify a parsed statement
    pub fn of(stmt: &Statement) -> Self {
        match stmt {
            Statement::Query { .. } => StatementKind::Select,
            Statement::Insert(insert) if insert.replace_into => StatementKind::Replace,
            Statement::Insert { .. } => StatementKind::Insert,
            Statement::Update { .. } => StatementKind::Update,
            Statement::Delete { .. } => StatementKind::Delete,
            Statement::CreateTable { .. }
            | Statement::CreateView { .. }
            | Statement::CreateIndex { .. }
            | Statement::CreateSchema { .. }
            | Statement::CreateDatabase { .. }
            | Statement::AlterTable { .. }
            | Statement::AlterView { .. }
            | Statement::AlterIndex { .. }
            | Statement::Drop { .. }
            | Statement::Truncate { .. } => StatementKind::Ddl,
            Statement::SetVariable { .. }
            | Statement::SetNames { .. }
            | Statement::SetTimeZone { .. } => StatementKind::Set,
            Statement::ShowTables { .. }
            | Statement::ShowColumns { .. }
            | Statement::ShowVariables { .. }
            | Statement::ShowCreate { .. }
            | Statement::ShowFunctions { .. } => StatementKind::Show,
            Statement::Use { .. } => StatementKind::Use,
            Statement::StartTransaction { .. } => StatementKind::Begin,
            Statement::Commit { .. } => StatementKind::Commit,
            Statement::Rollback { .. } => StatementKind::Rollback,
            Statement::Explain { .. } | Statement::ExplainTable { .. } => StatementKind::Explain,
            _ => StatementKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Replace => "REPLACE",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Ddl => "DDL",
            StatementKind::Set => "SET",
            StatementKind::Show => "SHOW",
            StatementKind::Use => "USE",
            StatementKind::Begin => "BEGIN",
            StatementKind::Commit => "COMMIT",
            StatementKind::Rollback => "ROLLBACK",
            StatementKind::Explain => "EXPLAIN",
            StatementKind::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqlDialect;

    fn kind_of(sql: &str) -> StatementKind {
        let stmt = SqlDialect::MySQL.parse_strict(sql).unwrap().unwrap();
        StatementKind::of(&stmt)
    }

    #[test]
    fn test_dml_kinds() {
        assert_eq!(kind_of("SELECT 1"), StatementKind::Select);
        assert_eq!(kind_of("INSERT INTO t (a) VALUES (1)"), StatementKind::Insert);
        assert_eq!(kind_of("REPLACE INTO t (a) VALUES (1)"), StatementKind::Replace);
        assert_eq!(kind_of("UPDATE t SET a = 1"), StatementKind::Update);
        assert_eq!(kind_of("DELETE FROM t WHERE a = 1"), StatementKind::Delete);
    }

    #[test]
    fn test_ddl_kinds() {
        assert_eq!(kind_of("CREATE TABLE foo (id int)"), StatementKind::Ddl);
        assert_eq!(kind_of("DROP TABLE foo"), StatementKind::Ddl);
        assert_eq!(kind_of("ALTER TABLE foo ADD COLUMN bar int"), StatementKind::Ddl);
    }

    #[test]
    fn test_session_kinds() {
        assert_eq!(kind_of("USE app"), StatementKind::Use);
        assert_eq!(kind_of("START TRANSACTION"), StatementKind::Begin);
        assert_eq!(kind_of("COMMIT"), StatementKind::Commit);
        assert_eq!(kind_of("ROLLBACK"), StatementKind::Rollback);
        assert_eq!(kind_of("SHOW TABLES"), StatementKind::Show);
    }

    #[test]
    fn test_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&StatementKind::Ddl).unwrap(),
            "\"DDL\""
        );
        assert_eq!(StatementKind::Select.to_string(), "SELECT");
    }
}
