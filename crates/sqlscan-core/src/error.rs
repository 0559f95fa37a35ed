//! Error and syntax error types

use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use thiserror::Error;

/// Internal conditions that must not be papered over with a guessed result
///
/// Malformed SQL is *not* an `ExtractError`; it is reported as
/// [`SyntaxErrorInfo`] data on the parse result.
#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    /// The parser produced an error whose text carries no position
    #[error("could not locate syntax error in parser message: {message}")]
    #[diagnostic(
        code(sqlscan::unrecognized_syntax_error),
        help("the parser error format is not one the locator understands")
    )]
    UnrecognizedSyntaxError { message: String },

    /// An INSERT ... VALUES with no rows
    #[error("INSERT into '{table}' has an empty VALUES list")]
    #[diagnostic(code(sqlscan::empty_insert))]
    EmptyInsert { table: String },
}

/// Result type alias for ExtractError
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Location of a syntax error in the original, untrimmed input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxErrorInfo {
    /// 1-based character index just past the offending token
    pub position: usize,
    /// The offending token, when the parser named one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub near: Option<String>,
}

impl SyntaxErrorInfo {
    pub fn new(position: usize, near: Option<String>) -> Self {
        Self { position, near }
    }

    /// 1-based start of the offending token
    pub fn start(&self) -> usize {
        let len = self.near.as_deref().map_or(0, |n| n.chars().count());
        self.position.saturating_sub(len)
    }

    /// 1-based end of the offending token (same as `position`)
    pub fn end(&self) -> usize {
        self.position
    }

    /// Zero-based span of the offending token, for source annotations
    pub fn span(&self) -> SourceSpan {
        let start = self.start().saturating_sub(1);
        SourceSpan::new(start.into(), self.end().saturating_sub(1) - start)
    }
}

impl std::fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "syntax error at position {}", self.position)?;
        if let Some(near) = &self.near {
            write!(f, " near '{}'", near)?;
        }
        Ok(())
    }
}
