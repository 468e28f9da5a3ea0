//! Fixture rewrite: redirects real table references to in-memory `VALUES`
//! fixtures for test-mode query execution.

use std::collections::HashMap;

use crate::ast::{Expr, Ident, QueryAst, QueryBody, TableRef};

use super::error::MissingFixtureError;

/// A synthetic table: its declared column list and literal row data.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureTable {
    pub columns: Vec<Ident>,
    pub rows: Vec<Vec<Expr>>,
}

/// What to do with a table that has no registered fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFixturePolicy {
    /// Leave the table reference untouched.
    Passthrough,
    /// Fail the whole rewrite with [`MissingFixtureError`].
    Error,
}

fn fold(ident: &Ident) -> String {
    match ident {
        Ident::Quoted(s) => s.clone(),
        Ident::Unquoted(s) => s.to_ascii_lowercase(),
    }
}

/// Candidate fixture-registry keys for a table reference, most specific
/// first: the schema-qualified name as written, the `defaultSchema`-
/// qualified name if the reference was bare, then the bare name itself.
fn candidate_keys(schema: Option<&Ident>, name: &Ident, default_schema: Option<&str>) -> Vec<String> {
    let bare = fold(name);
    match schema {
        Some(s) => vec![format!("{}.{bare}", fold(s))],
        None => {
            let mut keys = Vec::new();
            if let Some(default_schema) = default_schema {
                keys.push(format!("{}.{bare}", default_schema.to_ascii_lowercase()));
            }
            keys.push(bare);
            keys
        }
    }
}

fn rewrite_table_ref(
    table: &mut TableRef,
    default_schema: Option<&str>,
    fixtures: &HashMap<String, FixtureTable>,
    policy: MissingFixturePolicy,
) -> Result<(), MissingFixtureError> {
    match table {
        TableRef::Table {
            schema,
            name,
            alias,
        } => {
            let keys = candidate_keys(schema.as_ref(), name, default_schema);
            if let Some(fixture) = keys.iter().find_map(|k| fixtures.get(k)) {
                let resolved_alias = alias.clone().unwrap_or_else(|| name.clone());
                *table = TableRef::ValuesTable {
                    rows: fixture.rows.clone(),
                    alias: resolved_alias,
                    columns: fixture.columns.clone(),
                };
            } else {
                match policy {
                    MissingFixturePolicy::Passthrough => {}
                    MissingFixturePolicy::Error => {
                        return Err(MissingFixtureError { table: fold(name) });
                    }
                }
            }
            Ok(())
        }
        TableRef::Subquery { query, .. } => rewrite_query(query, default_schema, fixtures, policy),
        TableRef::ValuesTable { .. } => Ok(()),
        TableRef::Join { left, join } => {
            rewrite_table_ref(left, default_schema, fixtures, policy)?;
            rewrite_table_ref(&mut join.table, default_schema, fixtures, policy)
        }
    }
}

fn rewrite_body(
    body: &mut QueryBody,
    default_schema: Option<&str>,
    fixtures: &HashMap<String, FixtureTable>,
    policy: MissingFixturePolicy,
) -> Result<(), MissingFixtureError> {
    match body {
        QueryBody::Select(select) => {
            for table in &mut select.from {
                rewrite_table_ref(table, default_schema, fixtures, policy)?;
            }
            Ok(())
        }
        QueryBody::SetOp(op) => {
            rewrite_body(&mut op.left, default_schema, fixtures, policy)?;
            rewrite_body(&mut op.right, default_schema, fixtures, policy)
        }
        QueryBody::Values(_) => Ok(()),
        QueryBody::Paren(inner) => rewrite_query(inner, default_schema, fixtures, policy),
    }
}

/// Walks every table primary in `ast`, substituting a `VALUES (...)` row
/// source (column-aliased to the fixture's declared columns, carrying the
/// original table's alias or the table name itself) for any table matched
/// against `fixtures`. Column references elsewhere in the query keep
/// resolving correctly since the alias is preserved.
///
/// # Errors
///
/// Returns [`MissingFixtureError`] for the first unmatched table when
/// `policy` is [`MissingFixturePolicy::Error`].
pub fn rewrite_query(
    ast: &mut QueryAst,
    default_schema: Option<&str>,
    fixtures: &HashMap<String, FixtureTable>,
    policy: MissingFixturePolicy,
) -> Result<(), MissingFixtureError> {
    if let Some(with) = &mut ast.with {
        for cte in &mut with.ctes {
            rewrite_query(&mut cte.query, default_schema, fixtures, policy)?;
        }
    }
    rewrite_body(&mut ast.body, default_schema, fixtures, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;
    use crate::parser::Parser;

    const PG: PostgresDialect = PostgresDialect;

    fn fixtures_with_users() -> HashMap<String, FixtureTable> {
        let mut map = HashMap::new();
        map.insert(
            "users".to_string(),
            FixtureTable {
                columns: vec![Ident::unquoted("id"), Ident::unquoted("name")],
                rows: vec![vec![Expr::integer(1), Expr::string("ada")]],
            },
        );
        map
    }

    #[test]
    fn substitutes_matched_table_with_values() {
        let mut ast = Parser::parse("SELECT id FROM users", &PG).unwrap();
        rewrite_query(
            &mut ast,
            None,
            &fixtures_with_users(),
            MissingFixturePolicy::Error,
        )
        .unwrap();

        let select = ast.as_simple_select().unwrap();
        assert!(matches!(select.from[0], TableRef::ValuesTable { .. }));
    }

    #[test]
    fn preserves_explicit_alias() {
        let mut ast = Parser::parse("SELECT u.id FROM users u", &PG).unwrap();
        rewrite_query(
            &mut ast,
            None,
            &fixtures_with_users(),
            MissingFixturePolicy::Error,
        )
        .unwrap();

        let select = ast.as_simple_select().unwrap();
        let TableRef::ValuesTable { alias, .. } = &select.from[0] else {
            panic!("expected ValuesTable");
        };
        assert_eq!(alias.name(), "u");
    }

    #[test]
    fn passthrough_leaves_unmatched_table_alone() {
        let mut ast = Parser::parse("SELECT id FROM orders", &PG).unwrap();
        rewrite_query(
            &mut ast,
            None,
            &fixtures_with_users(),
            MissingFixturePolicy::Passthrough,
        )
        .unwrap();

        let select = ast.as_simple_select().unwrap();
        assert!(matches!(select.from[0], TableRef::Table { .. }));
    }

    #[test]
    fn error_policy_fails_on_unmatched_table() {
        let mut ast = Parser::parse("SELECT id FROM orders", &PG).unwrap();
        let err = rewrite_query(
            &mut ast,
            None,
            &fixtures_with_users(),
            MissingFixturePolicy::Error,
        )
        .unwrap_err();
        assert_eq!(err.table, "orders");
    }

    #[test]
    fn resolves_unqualified_table_against_default_schema() {
        let mut fixtures = HashMap::new();
        fixtures.insert(
            "public.users".to_string(),
            FixtureTable {
                columns: vec![Ident::unquoted("id")],
                rows: vec![vec![Expr::integer(1)]],
            },
        );
        let mut ast = Parser::parse("SELECT id FROM users", &PG).unwrap();
        rewrite_query(&mut ast, Some("public"), &fixtures, MissingFixturePolicy::Error).unwrap();

        let select = ast.as_simple_select().unwrap();
        assert!(matches!(select.from[0], TableRef::ValuesTable { .. }));
    }

    #[test]
    fn rewrites_tables_inside_ctes() {
        let mut ast = Parser::parse(
            "WITH recent AS (SELECT id FROM users) SELECT id FROM recent",
            &PG,
        )
        .unwrap();
        rewrite_query(
            &mut ast,
            None,
            &fixtures_with_users(),
            MissingFixturePolicy::Error,
        )
        .unwrap();

        let cte_select = ast.with.as_ref().unwrap().ctes[0]
            .query
            .as_simple_select()
            .unwrap();
        assert!(matches!(cte_select.from[0], TableRef::ValuesTable { .. }));
    }
}
