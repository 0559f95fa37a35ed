//! Output formatting

use miette::{IntoDiagnostic, Result};
use sqlscan_core::{Column, ParseResult, SyntaxErrorInfo, Table};

/// Render the full result as JSON
pub fn render_json(result: &ParseResult, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(result).into_diagnostic()
    } else {
        serde_json::to_string(result).into_diagnostic()
    }
}

/// Render a human-readable listing of each statement's tables
pub fn render_tables(result: &ParseResult) -> String {
    let mut out = String::new();

    for (i, stmt) in result.statements.iter().enumerate() {
        out.push_str(&format!("Statement {} ({}):\n", i + 1, stmt.kind));
        if stmt.tables.is_empty() {
            out.push_str("  (no tables)\n");
        }
        for table in &stmt.tables {
            out.push_str(&format!("  Table: {}\n", table_label(table)));
            for column in &table.columns {
                out.push_str(&format!("    - {}\n", column_label(column)));
            }
            if !table.rows.is_empty() {
                out.push_str(&format!("    ({} row(s))\n", table.rows.len()));
            }
        }
    }

    out
}

/// Print a syntax error with a caret under the offending token
pub fn print_syntax_error(error: &SyntaxErrorInfo, source: &str) {
    eprintln!("\x1b[31merror\x1b[0m: {}", error);

    let (line, col) = position_to_line_col(source, error.start());
    if let Some(source_line) = source.lines().nth(line.saturating_sub(1)) {
        let width = error.end().saturating_sub(error.start()).max(1);
        eprintln!("   |");
        eprintln!("{:>3} | {}", line, source_line);
        eprintln!("   | {}{}", " ".repeat(col.saturating_sub(1)), "^".repeat(width));
    }
}

fn table_label(table: &Table) -> String {
    match &table.alias {
        Some(alias) => format!("{} AS {}", table.name, alias),
        None => table.name.clone(),
    }
}

fn column_label(column: &Column) -> String {
    let mut label = column.name.clone();
    if let (Some(operator), Some(value)) = (&column.operator, &column.value) {
        label.push_str(&format!(" {} {}", operator, value));
    }
    if let Some(ts_type) = column.ts_type {
        label.push_str(&format!(" ({})", ts_type));
    }
    if let Some(in_type) = column.in_type {
        label.push_str(&format!(" [{}]", in_type));
    }
    label
}

/// Convert a 1-based character position to line and column (1-indexed)
fn position_to_line_col(source: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, ch) in source.chars().enumerate() {
        if i + 1 >= position {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tables() {
        let result = sqlscan_core::parse(
            "SELECT w.id FROM workspaces w WHERE version = 3; INSERT INTO t (a) VALUES (1)",
        )
        .unwrap();
        let out = render_tables(&result);
        assert_eq!(
            out,
            "Statement 1 (SELECT):\n  Table: workspaces AS w\n    - id\n    - version = 3 (number) [expression]\n\
             Statement 2 (INSERT):\n  Table: t\n    - a (number) [list]\n    (1 row(s))\n"
        );
    }

    #[test]
    fn test_render_json_without_error() {
        let result = ParseResult::default();
        assert_eq!(render_json(&result, false).unwrap(), r#"{"statements":[]}"#);
    }

    #[test]
    fn test_position_to_line_col() {
        assert_eq!(position_to_line_col("SELEC * FROM users", 1), (1, 1));
        assert_eq!(position_to_line_col("SELECT 1;\nSELEC 2", 11), (2, 1));
        assert_eq!(position_to_line_col("SELECT 1;\nSELEC 2", 13), (2, 3));
    }
}
