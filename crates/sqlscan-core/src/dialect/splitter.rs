//! Statement splitter
//!
//! Cuts a multi-statement script at the `;` tokens the dialect's tokenizer
//! produces, so quoting, escapes and comments follow the same rules the parser
//! applies afterwards. Pieces are returned verbatim (leading whitespace
//! included) so callers can keep exact character offsets.

use sqlparser::dialect::Dialect;
use sqlparser::tokenizer::{Location, Token, Tokenizer};

/// Split SQL text into raw statement pieces
///
/// The separator itself is not part of any piece, so the offset of piece
/// `n + 1` is the sum of the lengths of pieces `0..=n` plus one per
/// separator. A trailing piece that is only whitespace is dropped.
///
/// If the text cannot be fully tokenized, separators before the bad token
/// still split; everything after the last of them is one piece, left for the
/// parser to report.
pub fn split_statements<'a>(dialect: &dyn Dialect, sql: &'a str) -> Vec<&'a str> {
    let mut tokens = Vec::new();
    if let Err(err) = Tokenizer::new(dialect, sql).tokenize_with_location_into_buf(&mut tokens) {
        tracing::trace!(error = %err, "tokenizer stopped early");
    }

    let lines = LineStarts::new(sql);
    let mut pieces = Vec::new();
    let mut start = 0;

    for token in &tokens {
        if !matches!(token.token, Token::SemiColon) {
            continue;
        }
        let Some(idx) = lines.byte_offset(sql, token.span.start) else {
            continue;
        };
        pieces.push(&sql[start..idx]);
        start = idx + 1;
    }

    let rest = &sql[start..];
    if !rest.trim().is_empty() {
        pieces.push(rest);
    }

    pieces
}

/// Byte offsets of line starts, for turning tokenizer locations into offsets
struct LineStarts(Vec<usize>);

impl LineStarts {
    fn new(sql: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(sql.match_indices('\n').map(|(idx, _)| idx + 1));
        Self(starts)
    }

    /// Lines and columns are 1-based; columns count characters
    fn byte_offset(&self, sql: &str, location: Location) -> Option<usize> {
        let line_start = *self.0.get((location.line as usize).checked_sub(1)?)?;
        let column = (location.column as usize).checked_sub(1)?;
        sql[line_start..]
            .char_indices()
            .nth(column)
            .map(|(idx, _)| line_start + idx)
    }
}
