//! SQL Parser
//!
//! A hand-written recursive-descent parser with Pratt expression parsing,
//! producing a [`crate::ast::QueryAst`]. There is a single entry shape —
//! `SELECT` (including CTEs and set operations) or `VALUES` — rather than a
//! dispatch over statement kinds, since this crate only parses queries.
//!
//! # Parsing approach
//!
//! The outer structure (`WITH`, set operations, `ORDER BY`/`LIMIT`/`OFFSET`/
//! `FETCH`) is recursive descent. Expressions use a Pratt (top-down operator
//! precedence) parser (see [`pratt`]) that handles prefix, infix, and
//! postfix operators with correct precedence and associativity, including
//! the right-associative `^` and the highest-precedence postfix `::` cast.
//!
//! # Supported query shapes
//!
//! - `WITH [RECURSIVE] name [(cols)] AS (query), ... <body>`
//! - Set operations: `UNION [ALL]`, `INTERSECT [ALL]`, `EXCEPT [ALL]`,
//!   left-associative, with explicit `(...)` parenthesization preserved
//!   structurally so a parenthesized operand can carry its own `ORDER BY`/
//!   `LIMIT`.
//! - `VALUES (...), (...)` as a standalone query body or a `FROM`-clause row
//!   source.
//! - `SELECT [DISTINCT | DISTINCT ON (...)]` projections, including
//!   wildcards (`*`, `t.*`).
//! - `FROM` with `JOIN` (`INNER`, `LEFT/RIGHT/FULL [OUTER]`, `CROSS`,
//!   `NATURAL`), `ON`/`USING`, `LATERAL` subqueries.
//! - `WHERE`, `GROUP BY` (plain list, `GROUPING SETS`, `ROLLUP`, `CUBE`),
//!   `HAVING`, named `WINDOW` definitions, `FOR UPDATE`/`FOR SHARE`.
//! - `ORDER BY ... [ASC|DESC] [NULLS FIRST|LAST]`, `LIMIT`, `OFFSET`,
//!   `FETCH {FIRST|NEXT} n {ROW|ROWS} {ONLY|WITH TIES}`.
//!
//! # Expressions
//!
//! Literals (integers, floats, strings, `E'...'`, `$tag$...$tag$`),
//! parameters (`?`, `:name`, `@name`, `$n`), column references (bare,
//! qualified, wildcard), the full binary/unary operator set including
//! Postgres `::`/`->`/`->>`/`#>`/`#>>`, `IS [NOT] NULL`, `[NOT] BETWEEN`,
//! `[NOT] IN (...)`/`IN (SELECT ...)`, `CASE`, `CAST(... AS type)`,
//! `EXISTS (...)`, scalar subqueries, `ARRAY[...]`/`ROW(...)` constructors,
//! and function calls with `DISTINCT`, in-list `ORDER BY`,
//! `WITHIN GROUP (ORDER BY ...)`, `FILTER (WHERE ...)`, and `OVER`.
//!
//! # Not supported
//!
//! `INSERT`/`UPDATE`/`DELETE`, DDL (`CREATE`/`ALTER`/`DROP`), transactions
//! (`BEGIN`/`COMMIT`/`ROLLBACK`) — this crate only parses, transforms, and
//! reformats `SELECT`-shaped queries.

mod async_parse;
mod core;
mod error;
mod pratt;

pub use async_parse::{parse_async, CancellationToken};
pub use core::Parser;
pub use error::{AsyncParseError, Cancelled, ParseError};
