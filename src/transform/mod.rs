//! AST-level query transformers.
//!
//! Each transformer here takes a parsed [`crate::ast::QueryAst`] (or one of
//! its [`crate::ast::SimpleSelect`] bodies) and produces another AST with a
//! narrowly scoped structural change, without ever touching raw SQL text.
//! They compose: a caller typically parses once, runs one or more of these,
//! and hands the result to [`crate::format`] for rendering.

mod append_where;
mod dto_alias;
mod error;
mod fixture_rewrite;
mod param_inject;
mod union_all;

pub use append_where::{append_where, append_where_sql};
pub use dto_alias::alias_as_dto;
pub use error::{InjectError, MissingFixtureError};
pub use fixture_rewrite::{rewrite_query as rewrite_fixtures, FixtureTable, MissingFixturePolicy};
pub use param_inject::{inject as inject_params, ParamBindings, ParamValue};
pub use union_all::union_all;
