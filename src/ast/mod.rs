//! Abstract Syntax Tree (AST) types for SELECT queries.
//!
//! The tree rooted at [`QueryAst`] is the single shape this crate parses,
//! transforms, and formats; there is no separate `Statement` sum type for
//! INSERT/UPDATE/DELETE/DDL, which are out of scope (see the crate's
//! top-level documentation).

mod expression;
mod query;
mod table;
mod types;

pub use expression::{
    BinaryOp, Expr, ExprKind, FunctionArg, FunctionCall, Ident, InList, Literal, NullOrdering,
    OrderByExpr, OrderDirection, ParamRef, UnaryOp, WindowFrame, WindowFrameBound,
    WindowFrameUnit, WindowRef, WindowSpec,
};
pub use query::{
    Cte, Distinct, FetchClause, GroupByClause, LockStrength, NamedWindow, QueryAst, QueryBody,
    SelectItem, SetOperationSelect, SetOperator, SimpleSelect, ValuesQuery, WithClause,
};
pub use table::{JoinClause, JoinType, TableRef};
pub use types::DataType;
