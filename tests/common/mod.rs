#![allow(dead_code)]

use sqlforge_core::ast::QueryAst;
use sqlforge_core::dialect::{Dialect, PostgresDialect};
use sqlforge_core::format::{FormatOptions, FormattedQuery, SqlFormatter};
use sqlforge_core::parser::{ParseError, Parser};
use sqlforge_core::transform::ParamBindings;

pub const PG: PostgresDialect = PostgresDialect;

pub fn parse(sql: &str) -> QueryAst {
    Parser::parse(sql, &PG).unwrap_or_else(|e| panic!("failed to parse: {sql}\nerror: {e:?}"))
}

pub fn parse_with(sql: &str, dialect: &dyn Dialect) -> QueryAst {
    Parser::parse(sql, dialect).unwrap_or_else(|e| panic!("failed to parse: {sql}\nerror: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::parse(sql, &PG).expect_err(&format!("expected parse error for: {sql}"))
}

/// Formats `ast` under `options`, with no bound parameter values.
pub fn format(ast: &QueryAst, options: &FormatOptions) -> FormattedQuery {
    SqlFormatter::format(ast, options, &ParamBindings::new()).expect("formatting failed")
}

/// Parses, formats under the given options, and returns just the SQL text.
pub fn round_trip(sql: &str, options: &FormatOptions) -> String {
    format(&parse(sql), options).sql
}
