//! SQL dialect support

mod splitter;

use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::Token;
use std::str::FromStr;

pub use splitter::split_statements;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    #[default]
    MySQL,
    PostgreSQL,
    Generic,
}

impl SqlDialect {
    /// Get the sqlparser dialect for parsing
    pub fn parser_dialect(&self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::MySQL => Box::new(MySqlDialect {}),
            SqlDialect::PostgreSQL => Box::new(PostgreSqlDialect {}),
            SqlDialect::Generic => Box::new(GenericDialect {}),
        }
    }

    /// Split a script into statement texts using this dialect's tokenizer
    pub fn split<'a>(&self, sql: &'a str) -> Vec<&'a str> {
        split_statements(self.parser_dialect().as_ref(), sql)
    }

    /// Parse the text of exactly one statement
    ///
    /// Returns `Ok(None)` when the text holds no statement (blank or
    /// comment-only). Anything left after the first statement, other than
    /// separators, is reported as a syntax error rather than dropped.
    pub fn parse_strict(&self, sql: &str) -> Result<Option<Statement>, ParserError> {
        let dialect = self.parser_dialect();
        let mut parser = Parser::new(dialect.as_ref()).try_with_sql(sql)?;

        while parser.consume_token(&Token::SemiColon) {}
        if parser.peek_token().token == Token::EOF {
            return Ok(None);
        }

        let statement = parser.parse_statement()?;
        while parser.consume_token(&Token::SemiColon) {}
        match parser.peek_token().token {
            Token::EOF => Ok(Some(statement)),
            _ => parser.expected("end of statement", parser.peek_token()),
        }
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mysql8" | "mariadb" => Ok(SqlDialect::MySQL),
            "postgresql" | "postgres" | "pg" => Ok(SqlDialect::PostgreSQL),
            "generic" | "ansi" => Ok(SqlDialect::Generic),
            _ => Err(format!(
                "Unknown dialect: '{}'. Supported dialects: mysql, postgresql, generic.",
                s
            )),
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::MySQL => write!(f, "mysql"),
            SqlDialect::PostgreSQL => write!(f, "postgresql"),
            SqlDialect::Generic => write!(f, "generic"),
        }
    }
}
