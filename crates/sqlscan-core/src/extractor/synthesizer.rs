//! Table/column synthesis from collected facts

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Column, Row, Table};

use super::collector::{ColumnRef, Facts};

/// A table under construction, addressed by name
#[derive(Debug, Default)]
struct TableEntry {
    aliases: BTreeSet<String>,
    columns: BTreeMap<String, Column>,
    rows: Vec<Row>,
}

/// Turn raw facts into tables sorted by name, each with columns sorted by name
///
/// Everything is keyed by name in ordered maps, so the result does not
/// depend on the order in which the collector saw things.
pub(super) fn synthesize(facts: Facts) -> Vec<Table> {
    let mut tables: BTreeMap<String, TableEntry> = BTreeMap::new();

    for (name, aliases) in facts.table_refs {
        tables.entry(name).or_default().aliases.extend(aliases);
    }

    // Names seen only as relations (INSERT targets, DDL, ...)
    for name in facts.table_names {
        if tables.contains_key(&name) || is_alias(&tables, &name) {
            continue;
        }
        tables.insert(name, TableEntry::default());
    }

    let mut columns = facts.columns;
    for name in facts.bare_columns {
        if columns.iter().any(|c| c.name == name) {
            continue;
        }
        columns.insert(ColumnRef {
            qualifier: None,
            name,
        });
    }

    for column in columns {
        let Some(key) = table_for_column(&tables, column.qualifier.as_deref()) else {
            tracing::trace!(column = %column.name, qualifier = ?column.qualifier, "unattached column");
            continue;
        };
        if let Some(entry) = tables.get_mut(&key) {
            entry
                .columns
                .entry(column.name.clone())
                .or_insert_with(|| Column::new(column.name));
        }
    }

    // Declared insert columns belong to the insert target, whatever else the
    // statement reads from
    for (name, declared) in facts.insert_columns {
        if let Some(entry) = tables.get_mut(&name) {
            for column in declared {
                entry
                    .columns
                    .entry(column.clone())
                    .or_insert_with(|| Column::new(column));
            }
        }
    }

    for (name, rows) in facts.rows {
        if let Some(entry) = tables.get_mut(&name) {
            entry.rows.extend(rows);
        }
    }

    for comparison in facts.comparisons {
        let Some(key) = table_for_comparison(&tables, comparison.qualifier.as_deref()) else {
            continue;
        };
        let Some(column) = tables
            .get_mut(&key)
            .and_then(|entry| entry.columns.get_mut(&comparison.column))
        else {
            continue;
        };
        column.ts_type = comparison.value.as_ref().map(|v| v.ts_type());
        column.value = comparison.value;
        column.operator = comparison.operator;
        column.in_type = Some(comparison.in_type);
    }

    tables
        .into_iter()
        .map(|(name, entry)| Table {
            name,
            alias: entry.aliases.into_iter().next(),
            columns: entry.columns.into_values().collect(),
            rows: entry.rows,
        })
        .collect()
}

fn is_alias(tables: &BTreeMap<String, TableEntry>, name: &str) -> bool {
    tables.values().any(|entry| entry.aliases.contains(name))
}

/// Find the table a column fact attaches to
///
/// A qualifier must equal a table's alias; table names and aliases are
/// separate namespaces. With no qualifier, the sole table of the statement is
/// used; when there are several tables the reference is ambiguous.
fn table_for_column(
    tables: &BTreeMap<String, TableEntry>,
    qualifier: Option<&str>,
) -> Option<String> {
    match qualifier {
        Some(qualifier) => tables
            .iter()
            .find(|(_, entry)| entry.aliases.contains(qualifier))
            .map(|(name, _)| name.clone()),
        None => sole_table(tables),
    }
}

/// Find the table a comparison applies to: by table name, or the sole table
fn table_for_comparison(
    tables: &BTreeMap<String, TableEntry>,
    qualifier: Option<&str>,
) -> Option<String> {
    match qualifier {
        Some(qualifier) => tables.contains_key(qualifier).then(|| qualifier.to_string()),
        None => sole_table(tables),
    }
}

fn sole_table(tables: &BTreeMap<String, TableEntry>) -> Option<String> {
    match tables.len() {
        1 => tables.keys().next().cloned(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::collector::Comparison;
    use crate::model::RowValue;
    use crate::types::{InType, SqlValue, TsType};

    fn column_ref(qualifier: Option<&str>, name: &str) -> ColumnRef {
        ColumnRef {
            qualifier: qualifier.map(String::from),
            name: name.to_string(),
        }
    }

    fn aliased(pairs: &[(&str, &str)]) -> BTreeMap<String, BTreeSet<String>> {
        let mut refs: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, alias) in pairs {
            let aliases = refs.entry(name.to_string()).or_default();
            if !alias.is_empty() {
                aliases.insert(alias.to_string());
            }
        }
        refs
    }

    fn names(tables: &[Table]) -> Vec<&str> {
        tables.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_tables_sorted_and_aliased_columns_attached() {
        let facts = Facts {
            table_refs: aliased(&[("workspaces", "w"), ("sources", "s")]),
            columns: [
                column_ref(Some("w"), "id"),
                column_ref(Some("s"), "workspace_id"),
                column_ref(Some("s"), "slug"),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let tables = synthesize(facts);
        assert_eq!(names(&tables), vec!["sources", "workspaces"]);
        assert_eq!(tables[0].alias.as_deref(), Some("s"));
        let cols: Vec<_> = tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, vec!["slug", "workspace_id"]);
        assert_eq!(tables[1].columns, vec![Column::new("id")]);
    }

    #[test]
    fn test_unqualified_column_single_table_fallback() {
        let facts = Facts {
            table_refs: aliased(&[("workspaces", "w")]),
            columns: [column_ref(None, "id")].into_iter().collect(),
            ..Default::default()
        };
        let tables = synthesize(facts);
        assert_eq!(tables[0].columns, vec![Column::new("id")]);
    }

    #[test]
    fn test_unqualified_column_with_many_tables_is_dropped() {
        let facts = Facts {
            table_refs: aliased(&[("users", ""), ("orders", "")]),
            columns: [column_ref(None, "id")].into_iter().collect(),
            ..Default::default()
        };
        let tables = synthesize(facts);
        assert_eq!(tables.len(), 2);
        assert!(tables.iter().all(|t| t.columns.is_empty()));
    }

    #[test]
    fn test_bare_names_become_tables_unless_alias() {
        let facts = Facts {
            table_refs: aliased(&[("workspaces", "w")]),
            table_names: ["workspaces", "w", "audit_log"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Default::default()
        };
        let tables = synthesize(facts);
        assert_eq!(names(&tables), vec!["audit_log", "workspaces"]);
        assert_eq!(tables[0].alias, None);
    }

    #[test]
    fn test_bare_columns_not_duplicated() {
        let facts = Facts {
            table_refs: aliased(&[("users", "u")]),
            columns: [column_ref(Some("u"), "name")].into_iter().collect(),
            bare_columns: ["name", "email"].into_iter().map(String::from).collect(),
            ..Default::default()
        };
        let tables = synthesize(facts);
        let cols: Vec<_> = tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, vec!["email", "name"]);
    }

    #[test]
    fn test_table_name_is_not_a_column_qualifier() {
        let facts = Facts {
            table_refs: aliased(&[("users", ""), ("orders", "o")]),
            columns: [column_ref(Some("users"), "id"), column_ref(Some("orders"), "total")]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let tables = synthesize(facts);
        assert!(tables.iter().all(|t| t.columns.is_empty()));
    }

    #[test]
    fn test_insert_columns_attach_by_table_name() {
        let facts = Facts {
            table_names: ["archive".to_string()].into_iter().collect(),
            table_refs: aliased(&[("orders", "o")]),
            insert_columns: [(
                "archive".to_string(),
                ["id".to_string()].into_iter().collect(),
            )]
            .into_iter()
            .collect(),
            comparisons: vec![Comparison {
                qualifier: Some("archive".into()),
                column: "id".into(),
                operator: None,
                value: None,
                in_type: InType::List,
            }],
            ..Default::default()
        };
        let tables = synthesize(facts);
        assert_eq!(names(&tables), vec!["archive", "orders"]);
        assert_eq!(tables[0].columns[0].name, "id");
        assert_eq!(tables[0].columns[0].in_type, Some(InType::List));
        assert!(tables[1].columns.is_empty());
    }

    #[test]
    fn test_comparisons_overwrite_column_facts() {
        let facts = Facts {
            table_names: ["workspaces".to_string()].into_iter().collect(),
            columns: [column_ref(None, "version")].into_iter().collect(),
            comparisons: vec![Comparison {
                qualifier: None,
                column: "version".into(),
                operator: Some("=".into()),
                value: Some(SqlValue::Null),
                in_type: InType::Expression,
            }],
            ..Default::default()
        };
        let tables = synthesize(facts);
        let column = &tables[0].columns[0];
        assert_eq!(column.value, Some(SqlValue::Null));
        assert_eq!(column.ts_type, Some(TsType::Null));
        assert_eq!(column.operator.as_deref(), Some("="));
        assert_eq!(column.in_type, Some(InType::Expression));
    }

    #[test]
    fn test_comparison_resolves_by_table_name_only() {
        let facts = Facts {
            table_refs: aliased(&[("users", "u"), ("orders", "o")]),
            columns: [column_ref(Some("u"), "id"), column_ref(Some("o"), "total")]
                .into_iter()
                .collect(),
            comparisons: vec![
                Comparison {
                    qualifier: Some("users".into()),
                    column: "id".into(),
                    operator: Some(">".into()),
                    value: Some(SqlValue::Number(3)),
                    in_type: InType::Expression,
                },
                // An alias does not name a table for comparisons
                Comparison {
                    qualifier: Some("o".into()),
                    column: "total".into(),
                    operator: Some("<".into()),
                    value: Some(SqlValue::Number(9)),
                    in_type: InType::Expression,
                },
                Comparison {
                    qualifier: None,
                    column: "total".into(),
                    operator: Some("=".into()),
                    value: Some(SqlValue::Number(1)),
                    in_type: InType::Expression,
                },
            ],
            ..Default::default()
        };
        let tables = synthesize(facts);
        let orders = &tables[0];
        let users = &tables[1];
        assert_eq!(users.columns[0].value, Some(SqlValue::Number(3)));
        assert_eq!(orders.columns[0].value, None);
    }

    #[test]
    fn test_rows_attach_by_table_name() {
        let row = Row {
            values: vec![RowValue::from(Some(SqlValue::Number(1)))],
        };
        let facts = Facts {
            table_names: ["users".to_string()].into_iter().collect(),
            rows: [("users".to_string(), vec![row.clone()])].into_iter().collect(),
            ..Default::default()
        };
        let tables = synthesize(facts);
        assert_eq!(tables[0].rows, vec![row]);
    }

    #[test]
    fn test_self_join_keeps_one_table() {
        let facts = Facts {
            table_refs: aliased(&[("users", "u2"), ("users", "u1")]),
            columns: [column_ref(Some("u1"), "id"), column_ref(Some("u2"), "manager_id")]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let tables = synthesize(facts);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].alias.as_deref(), Some("u1"));
        assert_eq!(tables[0].columns.len(), 2);
    }
}
