//! sqlscan-core: SQL table/column extraction library
//!
//! This library parses raw SQL text and reports, per statement, every
//! referenced table, its columns, and any literal values compared against or
//! inserted into those columns. Syntax errors are located precisely against
//! the original multi-statement input.

pub mod dialect;
pub mod error;
pub mod extractor;
pub mod model;
pub mod types;

pub use dialect::SqlDialect;
pub use error::{ExtractError, SyntaxErrorInfo};
pub use extractor::{parse, ExtractOptions, Extractor};
pub use model::{Column, ParseResult, Row, RowValue, Statement, StatementKind, Table};
pub use types::{InType, SqlValue, TsType};
