//! Literal classification

use chrono::DateTime;
use sqlparser::ast::{Expr, UnaryOperator, Value};

use crate::types::SqlValue;

/// Classify a literal expression
///
/// Never fails: anything that is not a recognizable literal (function
/// calls, nested expressions, placeholders) yields `None`.
pub fn classify(expr: &Expr) -> Option<SqlValue> {
    match expr {
        Expr::Value(value) => classify_value(value),
        Expr::UnaryOp { op, expr } => match (op, expr.as_ref()) {
            (UnaryOperator::Minus, Expr::Value(Value::Number(n, _))) => {
                Some(SqlValue::Number(parse_integer(n).wrapping_neg()))
            }
            (UnaryOperator::Plus, Expr::Value(Value::Number(n, _))) => {
                Some(SqlValue::Number(parse_integer(n)))
            }
            _ => None,
        },
        _ => None,
    }
}

fn classify_value(value: &Value) -> Option<SqlValue> {
    match value {
        Value::SingleQuotedString(s)
        | Value::DoubleQuotedString(s)
        | Value::NationalStringLiteral(s)
        | Value::EscapedStringLiteral(s) => Some(classify_string(s)),
        Value::DollarQuotedString(s) => Some(classify_string(&s.value)),
        Value::Number(n, _) => Some(SqlValue::Number(parse_integer(n))),
        Value::HexStringLiteral(h) => Some(SqlValue::Number(parse_radix(h, 16))),
        Value::Boolean(b) => Some(SqlValue::Boolean(*b)),
        Value::Null => Some(SqlValue::Null),
        _ => None,
    }
}

fn classify_string(s: &str) -> SqlValue {
    if DateTime::parse_from_rfc3339(s).is_ok() {
        SqlValue::Date(s.to_string())
    } else {
        SqlValue::String(s.to_string())
    }
}

/// Whether an expression is a literal that can constrain a column
///
/// String, numeric, hex, boolean and NULL literals qualify. Bind
/// placeholders (`?`, `$1`, `:name`) qualify only when allowed; they carry no
/// value of their own.
pub fn is_value(expr: &Expr, allow_placeholders: bool) -> bool {
    match expr {
        Expr::Value(Value::Placeholder(_)) => allow_placeholders,
        Expr::Value(value) => classify_value(value).is_some(),
        Expr::UnaryOp { .. } => classify(expr).is_some(),
        _ => false,
    }
}

/// Parse an integer literal, detecting the base from its prefix
///
/// Accepts `0x`/`0o`/`0b` prefixes and a leading-zero octal form. Anything
/// else that is not a plain decimal integer (including decimals such as
/// `3.14` and exponents) becomes 0.
pub(super) fn parse_integer(text: &str) -> i64 {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let lower = digits.to_ascii_lowercase();
    let value = if let Some(hex) = lower.strip_prefix("0x") {
        parse_radix(hex, 16)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        parse_radix(oct, 8)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        parse_radix(bin, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        parse_radix(&lower[1..], 8)
    } else {
        parse_radix(&lower, 10)
    };

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

fn parse_radix(digits: &str, radix: u32) -> i64 {
    let digits = digits.replace('_', "");
    if digits.starts_with(['+', '-']) {
        return 0;
    }
    match i64::from_str_radix(&digits, radix) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(literal = %digits, radix, %err, "numeric literal degraded to 0");
            0
        }
    }
}
