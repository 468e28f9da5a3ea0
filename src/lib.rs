//! # sqlforge-core
//!
//! A hand-written SQL lexer and recursive-descent/Pratt parser for `SELECT`
//! queries, a set of AST-level transforms, and a dialect-aware formatter —
//! the pipeline a query-building or query-rewriting tool sits on top of.
//!
//! This crate deliberately parses one shape only: `SELECT` (with CTEs, set
//! operations, and `VALUES`). There is no `Statement` sum type spanning
//! `INSERT`/`UPDATE`/`DELETE`/DDL, and no live schema catalog — see
//! [`ast`]'s module documentation for what's in and out of scope.
//!
//! ## Pipeline
//!
//! ```rust
//! use sqlforge_core::dialect::PostgresDialect;
//! use sqlforge_core::format::{FormatOptions, Preset, SqlFormatter};
//! use sqlforge_core::parser::Parser;
//! use sqlforge_core::transform::{self, ParamBindings};
//!
//! let dialect = PostgresDialect;
//! let mut ast = Parser::parse("SELECT id, email FROM users", &dialect).unwrap();
//!
//! let mut bindings = ParamBindings::new();
//! if let Some(select) = ast.as_simple_select_mut() {
//!     transform::inject_params(
//!         select,
//!         &[("active".into(), transform::ParamValue::Boolean(true))],
//!         &mut bindings,
//!     )
//!     .unwrap();
//! }
//!
//! let options = FormatOptions::new(Preset::Postgres);
//! let formatted = SqlFormatter::format(&ast, &options, &bindings).unwrap();
//! assert_eq!(
//!     formatted.sql,
//!     "SELECT id, email FROM users WHERE active = $1"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] — tokenizes SQL text, dialect-aware for quoting and parameter
//!   syntax.
//! - [`ast`] — the [`ast::QueryAst`] tree every stage of this crate shares.
//! - [`dialect`] — per-database lexing acceptance and formatter defaults.
//! - [`parser`] — builds a [`ast::QueryAst`] from source text, synchronously
//!   or cooperatively cancellable via [`parser::parse_async`].
//! - [`transform`] — structural AST rewrites: appending predicates, injecting
//!   parameters, merging queries with `UNION ALL`, substituting fixture
//!   tables, aliasing a projection to DTO field names.
//! - [`format`] — renders a [`ast::QueryAst`] back to SQL text plus a
//!   collected parameter payload, under explicit dialect/case/quoting
//!   options.

pub mod ast;
pub mod dialect;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod transform;

pub use ast::QueryAst;
pub use format::{FormatOptions, FormatError, Preset, SqlFormatter};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};
