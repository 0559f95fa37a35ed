//! Syntax error locator
//!
//! The parser reports errors as text, with a location relative to the single
//! statement it was given. This module pulls the location back out and
//! rebases it onto the original multi-statement input.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ExtractError, Result, SyntaxErrorInfo};

static POSITION_RE: OnceLock<Regex> = OnceLock::new();
static LOCATION_RE: OnceLock<Regex> = OnceLock::new();

/// `syntax error at position 10 near 'selec'`
fn position_regex() -> &'static Regex {
    POSITION_RE.get_or_init(|| {
        Regex::new(r#"syntax error at position (\d+)(?: near ['"]([^'"]*)['"])?"#)
            .expect("valid regex")
    })
}

/// `Expected: an SQL statement, found: SELEC at Line: 1, Column: 1`
fn location_regex() -> &'static Regex {
    LOCATION_RE.get_or_init(|| {
        Regex::new(r"(?:found: (.+?))? at Line: (\d+), Column: (\d+)").expect("valid regex")
    })
}

/// Compute the error location in the original input
///
/// `statement` is the text that was handed to the parser and `offset` the
/// number of characters of the original input that precede it. If the
/// message contains several locations, the last one wins.
pub fn locate(message: &str, statement: &str, offset: usize) -> Result<SyntaxErrorInfo> {
    // (match start in message, location relative to the statement)
    let mut located: Option<(usize, SyntaxErrorInfo)> = None;

    for caps in position_regex().captures_iter(message) {
        let Some(position) = caps.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) else {
            continue;
        };
        let near = caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .filter(|n| !n.is_empty());
        let start = caps.get(0).map_or(0, |m| m.start());
        located = Some((start, SyntaxErrorInfo::new(position, near)));
    }

    for caps in location_regex().captures_iter(message) {
        let start = caps.get(0).map_or(0, |m| m.start());
        if located.as_ref().is_some_and(|(prev, _)| *prev > start) {
            continue;
        }
        let (Some(line), Some(column)) = (
            caps.get(2).and_then(|m| m.as_str().parse::<usize>().ok()),
            caps.get(3).and_then(|m| m.as_str().parse::<usize>().ok()),
        ) else {
            continue;
        };
        let near = caps.get(1).map(|m| m.as_str().to_string());
        let token_len = near.as_deref().map_or(0, |n| n.chars().count());
        let index = char_index(statement, line, column);
        located = Some((start, SyntaxErrorInfo::new(index + token_len + 1, near)));
    }

    // The statement ended early; EOF carries no location of its own.
    if located.is_none() && message.trim_end().ends_with("found: EOF") {
        let end = statement.chars().count() + 1;
        located = Some((0, SyntaxErrorInfo::new(end, None)));
    }

    let Some((_, mut info)) = located else {
        return Err(ExtractError::UnrecognizedSyntaxError {
            message: message.to_string(),
        });
    };
    info.position += offset;
    Ok(info)
}

/// Zero-based character index of a 1-based line/column pair
fn char_index(text: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;

    for (idx, ch) in text.chars().enumerate() {
        if current_line == line {
            break;
        }
        if ch == '\n' {
            current_line += 1;
            line_start = idx + 1;
        }
    }

    line_start + column.saturating_sub(1)
}
