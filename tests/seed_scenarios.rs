//! Concrete seed scenarios: one test per worked example.

mod common;

use sqlforge_core::dialect::{MsSqlDialect, MySqlDialect, PlaceholderStyle, PostgresDialect};
use sqlforge_core::format::{FormatOptions, ParamsPayload, Preset, SqlFormatter};
use sqlforge_core::transform::{self, MissingFixturePolicy, ParamBindings, ParamValue};

use common::{format, parse, parse_with};

#[test]
fn append_where_adds_a_single_predicate() {
    let mut ast = parse("SELECT id, name, age FROM users");
    let select = ast.as_simple_select_mut().unwrap();
    transform::append_where_sql(select, "age >= 18", &PostgresDialect).unwrap();

    let out = format(&ast, &FormatOptions::new(Preset::Postgres));
    assert_eq!(
        out.sql,
        "SELECT id, name, age FROM users WHERE age >= 18"
    );
}

#[test]
fn append_where_twice_ands_the_predicate_in_again() {
    let mut ast = parse("SELECT id FROM users");
    let select = ast.as_simple_select_mut().unwrap();
    transform::append_where_sql(select, "age >= 18", &PostgresDialect).unwrap();
    transform::append_where_sql(select, "age >= 18", &PostgresDialect).unwrap();

    let out = format(&ast, &FormatOptions::new(Preset::Postgres));
    assert_eq!(
        out.sql,
        "SELECT id FROM users WHERE age >= 18 AND age >= 18"
    );
}

#[test]
fn param_injection_appends_bound_predicates() {
    let mut ast = parse("SELECT id, name FROM users WHERE active = true");
    let select = ast.as_simple_select_mut().unwrap();
    let mut bindings = ParamBindings::new();
    transform::inject_params(
        select,
        &[
            ("id".to_string(), ParamValue::Integer(42)),
            ("name".to_string(), ParamValue::Text("Alice".to_string())),
        ],
        &mut bindings,
    )
    .unwrap();

    let options = FormatOptions::new(Preset::Postgres)
        .with_placeholder_style(PlaceholderStyle::Named);
    let out = SqlFormatter::format(&ast, &options, &bindings).unwrap();
    assert_eq!(
        out.sql,
        "SELECT id, name FROM users WHERE active = TRUE AND id = :id AND name = :name"
    );
    assert_eq!(
        out.params,
        ParamsPayload::Named(vec![
            ("id".to_string(), ParamValue::Integer(42)),
            ("name".to_string(), ParamValue::Text("Alice".to_string())),
        ])
    );
}

#[test]
fn union_merge_is_left_associative() {
    let users = parse("SELECT id FROM users");
    let posts = parse("SELECT id FROM posts");
    let products = parse("SELECT id FROM products");

    let merged = transform::union_all(transform::union_all(users, posts), products);
    let out = format(&merged, &FormatOptions::new(Preset::Postgres));
    assert_eq!(
        out.sql,
        "(SELECT id FROM users UNION ALL SELECT id FROM posts) UNION ALL SELECT id FROM products"
    );
}

#[test]
fn fixture_rewrite_reports_missing_table_under_error_policy() {
    let mut ast = parse("SELECT id FROM orders");
    let err = transform::rewrite_fixtures(
        &mut ast,
        None,
        &std::collections::HashMap::new(),
        MissingFixturePolicy::Error,
    )
    .unwrap_err();
    assert_eq!(err.table, "orders");
}

#[test]
fn dialect_switch_named_then_numbered_assigns_first_occurrence_indices() {
    let ast = parse("SELECT id FROM users WHERE id = :id OR parent_id = :id");

    let named = format(
        &ast,
        &FormatOptions::new(Preset::Postgres)
            .with_placeholder_style(PlaceholderStyle::Named),
    );
    assert_eq!(
        named.sql,
        "SELECT id FROM users WHERE id = :id OR parent_id = :id"
    );

    let numbered = format(
        &ast,
        &FormatOptions::new(Preset::Postgres)
            .with_placeholder_style(PlaceholderStyle::Numbered),
    );
    assert_eq!(
        numbered.sql,
        "SELECT id FROM users WHERE id = $1 OR parent_id = $1"
    );
}

#[test]
fn dollar_quoted_string_round_trips_its_content() {
    let ast = parse("SELECT $tag$it's fine$tag$");
    let out = format(&ast, &FormatOptions::new(Preset::Postgres));
    assert_eq!(out.sql, "SELECT $tag$it's fine$tag$");
}

#[test]
fn mysql_preset_defaults_to_backtick_quoting_and_anonymous_placeholders() {
    let dialect = MySqlDialect;
    let ast = parse_with("SELECT `order` FROM users WHERE id = ?", &dialect);
    let out = format(&ast, &FormatOptions::new(Preset::MySql));
    assert_eq!(out.sql, "SELECT `order` FROM users WHERE id = ?");
}

#[test]
fn mssql_preset_accepts_at_parameters() {
    let dialect = MsSqlDialect;
    let ast = parse_with("SELECT id FROM users WHERE id = @id", &dialect);
    let out = format(&ast, &FormatOptions::new(Preset::MsSql));
    assert_eq!(out.sql, "SELECT id FROM users WHERE id = @id");
}

#[test]
fn dto_alias_wraps_a_query_and_renames_its_columns() {
    let inner = parse("SELECT id, email FROM users WHERE active = true");
    let outer = transform::alias_as_dto(
        inner,
        &[
            ("userId".to_string(), "id".to_string()),
            ("emailAddress".to_string(), "email".to_string()),
        ],
    );

    let out = format(&outer, &FormatOptions::new(Preset::Postgres));
    assert_eq!(
        out.sql,
        "SELECT id AS \"userId\", email AS \"emailAddress\" FROM (SELECT id, email FROM users WHERE active = TRUE) AS __dto"
    );
}
