//! Statement extraction
//!
//! Splits the input into statements, parses each one, and turns its AST into
//! the sorted `Table -> Column` shape. Parsing stops at the first statement
//! that fails; its error is positioned against the original input.

mod collector;
mod locator;
mod synthesizer;
mod value;

use sqlparser::ast;

use crate::dialect::SqlDialect;
use crate::error::Result;
use crate::model::{ParseResult, Statement, StatementKind, Table};

pub use locator::locate;
pub use value::{classify, is_value};

/// Characters trimmed from both ends of the input before splitting
const TRIM_CUTSET: &[char] = &['\t', ' ', '\n', '\x0B', '\x0C', '\r'];

/// Extraction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub dialect: SqlDialect,
    /// Treat bind placeholders (`?`, `$1`) as comparison values
    pub allow_placeholders: bool,
    /// Keep the parser's AST on each statement
    pub include_tree: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            dialect: SqlDialect::default(),
            allow_placeholders: false,
            include_tree: true,
        }
    }
}

/// SQL extractor - parses queries and reports tables, columns and values
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn with_dialect(dialect: SqlDialect) -> Self {
        Self::with_options(ExtractOptions {
            dialect,
            ..Default::default()
        })
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Parse a query that may hold several `;`-separated statements
    ///
    /// A syntax error is returned as data on the result, alongside the
    /// statements parsed before it. `Err` is reserved for internal
    /// conditions such as a parser error that cannot be located.
    pub fn parse(&self, sql: &str) -> Result<ParseResult> {
        let mut result = ParseResult::default();

        let trimmed = sql.trim_start_matches(TRIM_CUTSET);
        // Error positions are reported against the untrimmed input
        let mut offset = sql[..sql.len() - trimmed.len()].chars().count();
        let trimmed = trimmed.trim_end_matches(TRIM_CUTSET);

        for piece in self.options.dialect.split(trimmed) {
            match self.options.dialect.parse_strict(piece) {
                Ok(Some(tree)) => {
                    let kind = StatementKind::of(&tree);
                    let tables = self.extract_tables(&tree)?;
                    tracing::debug!(%kind, tables = tables.len(), "parsed statement");
                    result.statements.push(Statement {
                        kind,
                        tables,
                        tree: self.options.include_tree.then_some(tree),
                    });
                }
                Ok(None) => {
                    tracing::debug!(offset, "skipping empty statement");
                }
                Err(err) => {
                    let message = err.to_string();
                    tracing::debug!(offset, error = %message, "statement failed to parse");
                    // Later statements are not attempted
                    result.error = Some(locate(&message, piece, offset)?);
                    break;
                }
            }
            offset += piece.chars().count() + 1;
        }

        Ok(result)
    }

    /// Extract the sorted tables of a single parsed statement
    pub fn extract_tables(&self, stmt: &ast::Statement) -> Result<Vec<Table>> {
        let facts = collector::FactCollector::new(self.options.allow_placeholders).collect(stmt)?;
        Ok(synthesizer::synthesize(facts))
    }
}

/// Parse a query with default options
pub fn parse(sql: &str) -> Result<ParseResult> {
    Extractor::new().parse(sql)
}
