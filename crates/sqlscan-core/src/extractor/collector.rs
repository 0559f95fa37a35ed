//! Fact collector - one pass over the AST
//!
//! Walking the tree is the expensive part, so it happens exactly once. The
//! collector only records what it sees; relating columns to tables is left to
//! the synthesizer.

use sqlparser::ast::{
    AssignmentTarget, BinaryOperator, Expr, Ident, Insert, ObjectName, SetExpr, Statement,
    TableFactor, Visit, Visitor,
};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::ControlFlow;

use crate::error::{ExtractError, Result};
use crate::model::{Row, RowValue};
use crate::types::{InType, SqlValue};

use super::value::{classify, is_value};

/// A column reference, optionally qualified by a table alias or name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct ColumnRef {
    pub(super) qualifier: Option<String>,
    pub(super) name: String,
}

/// A literal constraint on a column
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Comparison {
    pub(super) qualifier: Option<String>,
    pub(super) column: String,
    pub(super) operator: Option<String>,
    pub(super) value: Option<SqlValue>,
    pub(super) in_type: InType,
}

/// Everything gathered from one statement, unrelated and unordered
#[derive(Debug, Default)]
pub(super) struct Facts {
    /// Table references from FROM/JOIN/UPDATE/DELETE (name -> aliases)
    pub(super) table_refs: BTreeMap<String, BTreeSet<String>>,
    /// Every relation name seen anywhere
    pub(super) table_names: BTreeSet<String>,
    pub(super) columns: BTreeSet<ColumnRef>,
    /// Column names seen without any qualifier context
    pub(super) bare_columns: BTreeSet<String>,
    /// INSERT column lists by table name
    pub(super) insert_columns: BTreeMap<String, BTreeSet<String>>,
    /// In source order; later comparisons on the same column win
    pub(super) comparisons: Vec<Comparison>,
    /// Inserted rows by table name
    pub(super) rows: BTreeMap<String, Vec<Row>>,
}

/// AST visitor that fills a [`Facts`] accumulator
pub(super) struct FactCollector {
    allow_placeholders: bool,
    facts: Facts,
}

impl FactCollector {
    pub(super) fn new(allow_placeholders: bool) -> Self {
        Self {
            allow_placeholders,
            facts: Facts::default(),
        }
    }

    /// Walk a statement once and return the collected facts
    pub(super) fn collect(mut self, stmt: &Statement) -> Result<Facts> {
        if let ControlFlow::Break(err) = stmt.visit(&mut self) {
            return Err(err);
        }
        tracing::trace!(
            tables = self.facts.table_refs.len(),
            names = self.facts.table_names.len(),
            columns = self.facts.columns.len(),
            comparisons = self.facts.comparisons.len(),
            "collected facts"
        );
        Ok(self.facts)
    }

    fn add_column(&mut self, qualifier: Option<&Ident>, column: &Ident) {
        if column.value.is_empty() {
            return;
        }
        self.facts.columns.insert(ColumnRef {
            qualifier: qualifier
                .map(|q| q.value.clone())
                .filter(|q| !q.is_empty()),
            name: column.value.clone(),
        });
    }

    fn add_comparison(&mut self, left: &Expr, operator: &str, right: &Expr) {
        let Some((qualifier, column)) = column_parts(left) else {
            return;
        };
        if column.value.is_empty() || !is_value(right, self.allow_placeholders) {
            return;
        }
        self.facts.comparisons.push(Comparison {
            qualifier: qualifier.map(|q| q.value.clone()),
            column: column.value.clone(),
            operator: Some(operator.to_string()),
            value: classify(right),
            in_type: InType::Expression,
        });
    }

    fn collect_insert(&mut self, insert: &Insert) -> Result<()> {
        let Some(table) = object_name(&insert.table_name) else {
            return Ok(());
        };
        self.facts.table_names.insert(table.clone());

        let values = insert
            .source
            .as_deref()
            .and_then(|query| match query.body.as_ref() {
                SetExpr::Values(values) => Some(values),
                _ => None,
            });

        let first_row = match values {
            Some(values) => {
                if values.rows.is_empty() {
                    return Err(ExtractError::EmptyInsert { table });
                }
                let rows = self.facts.rows.entry(table.clone()).or_default();
                for row in &values.rows {
                    rows.push(Row {
                        values: row.iter().map(|expr| RowValue::from(classify(expr))).collect(),
                    });
                }
                values.rows.first()
            }
            // INSERT ... SELECT: no literal rows to pair with the column list
            None => None,
        };

        // The parser accepts rows whose arity differs from the column list;
        // columns are still reported, just without values.
        let paired = first_row.filter(|row| row.len() == insert.columns.len());
        if paired.is_none() && first_row.is_some() {
            tracing::debug!(
                table = %table,
                columns = insert.columns.len(),
                values = first_row.map_or(0, Vec::len),
                "insert arity mismatch"
            );
        }

        for (idx, column) in insert.columns.iter().enumerate() {
            if column.value.is_empty() {
                continue;
            }
            self.facts
                .insert_columns
                .entry(table.clone())
                .or_default()
                .insert(column.value.clone());
            self.facts.comparisons.push(Comparison {
                qualifier: Some(table.clone()),
                column: column.value.clone(),
                operator: None,
                value: paired.and_then(|row| classify(&row[idx])),
                in_type: InType::List,
            });
        }

        Ok(())
    }

    fn collect_assignment_target(&mut self, target: &AssignmentTarget) {
        let names = match target {
            AssignmentTarget::ColumnName(name) => std::slice::from_ref(name),
            AssignmentTarget::Tuple(names) => names.as_slice(),
        };
        for name in names {
            match name.0.as_slice() {
                [] => {}
                [column] => {
                    if !column.value.is_empty() {
                        self.facts.bare_columns.insert(column.value.clone());
                    }
                }
                [.., qualifier, column] => self.add_column(Some(qualifier), column),
            }
        }
    }
}

impl Visitor for FactCollector {
    type Break = ExtractError;

    fn pre_visit_statement(&mut self, stmt: &Statement) -> ControlFlow<Self::Break> {
        match stmt {
            Statement::Insert(insert) => {
                if let Err(err) = self.collect_insert(insert) {
                    return ControlFlow::Break(err);
                }
            }
            Statement::Update { assignments, .. } => {
                for assignment in assignments {
                    self.collect_assignment_target(&assignment.target);
                }
            }
            Statement::CreateTable(create) => {
                if let Some(name) = object_name(&create.name) {
                    self.facts.table_names.insert(name);
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        if let Some(name) = object_name(relation) {
            self.facts.table_names.insert(name);
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, factor: &TableFactor) -> ControlFlow<Self::Break> {
        if let TableFactor::Table { name, alias, .. } = factor {
            if let Some(name) = object_name(name) {
                let aliases = self.facts.table_refs.entry(name).or_default();
                if let Some(alias) = alias {
                    if !alias.name.value.is_empty() {
                        aliases.insert(alias.name.value.clone());
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        match expr {
            // `VALUES (1, DEFAULT)` puts the keyword in an identifier node
            Expr::Identifier(ident) if is_default_keyword(ident) => {}
            Expr::Identifier(_) | Expr::CompoundIdentifier(_) => {
                if let Some((qualifier, column)) = column_parts(expr) {
                    self.add_column(qualifier, column);
                }
            }
            Expr::BinaryOp { left, op, right } => {
                if let Some(operator) = comparison_operator(op) {
                    self.add_comparison(left, operator, right);
                }
            }
            Expr::Like {
                negated,
                expr,
                pattern,
                ..
            } => {
                let operator = if *negated { "not like" } else { "like" };
                self.add_comparison(expr, operator, pattern);
            }
            Expr::ILike {
                negated,
                expr,
                pattern,
                ..
            } => {
                let operator = if *negated { "not ilike" } else { "ilike" };
                self.add_comparison(expr, operator, pattern);
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}

/// Split a column expression into (qualifier, column)
fn column_parts(expr: &Expr) -> Option<(Option<&Ident>, &Ident)> {
    match expr {
        Expr::Identifier(ident) => Some((None, ident)),
        Expr::CompoundIdentifier(idents) => match idents.as_slice() {
            [] => None,
            [column] => Some((None, column)),
            [.., qualifier, column] => Some((Some(qualifier), column)),
        },
        _ => None,
    }
}

fn is_default_keyword(ident: &Ident) -> bool {
    ident.quote_style.is_none() && ident.value.eq_ignore_ascii_case("default")
}

/// The table part of a possibly schema-qualified name
fn object_name(name: &ObjectName) -> Option<String> {
    name.0
        .last()
        .map(|ident| ident.value.clone())
        .filter(|value| !value.is_empty())
}

fn comparison_operator(op: &BinaryOperator) -> Option<&'static str> {
    match op {
        BinaryOperator::Eq => Some("="),
        BinaryOperator::NotEq => Some("!="),
        BinaryOperator::Lt => Some("<"),
        BinaryOperator::LtEq => Some("<="),
        BinaryOperator::Gt => Some(">"),
        BinaryOperator::GtEq => Some(">="),
        BinaryOperator::Spaceship => Some("<=>"),
        _ => None,
    }
}
