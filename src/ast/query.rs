//! Query AST: the top-level parse result and the `SELECT`/set-operation/
//! `VALUES` bodies it can wrap.

use crate::lexer::Span;

use super::expression::{Expr, Ident, OrderByExpr, WindowSpec};
use super::table::TableRef;

/// `DISTINCT` behavior of a `SimpleSelect`.
#[derive(Debug, Clone, PartialEq)]
pub enum Distinct {
    /// No `DISTINCT`.
    All,
    /// Plain `DISTINCT`.
    Distinct,
    /// `DISTINCT ON (expr, ...)` (PostgreSQL).
    On(Vec<Expr>),
}

/// The `GROUP BY` clause shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupByClause {
    /// No `GROUP BY`.
    None,
    /// A plain list of grouping expressions.
    Exprs(Vec<Expr>),
    /// `GROUP BY GROUPING SETS ((...), (...), ())`.
    GroupingSets(Vec<Vec<Expr>>),
    /// `GROUP BY ROLLUP (...)`.
    Rollup(Vec<Expr>),
    /// `GROUP BY CUBE (...)`.
    Cube(Vec<Expr>),
}

impl GroupByClause {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A single projected item in a `SELECT` list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*` or `table.*`.
    Wildcard { table: Option<Ident> },
    /// An expression, optionally aliased.
    Expr { expr: Expr, alias: Option<Ident> },
}

/// A name bound by the `WINDOW` clause: `WINDOW w AS (...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedWindow {
    pub name: String,
    pub spec: WindowSpec,
}

/// `FOR UPDATE`/`FOR SHARE` row-locking clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStrength {
    Update,
    Share,
}

/// A single non-compound `SELECT`.
#[derive(Debug, Clone)]
pub struct SimpleSelect {
    pub distinct: Distinct,
    pub projection: Vec<SelectItem>,
    pub from: Vec<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: GroupByClause,
    pub having: Option<Expr>,
    pub windows: Vec<NamedWindow>,
    pub locking: Option<LockStrength>,
    pub span: Span,
}

impl PartialEq for SimpleSelect {
    fn eq(&self, other: &Self) -> bool {
        self.distinct == other.distinct
            && self.projection == other.projection
            && self.from == other.from
            && self.where_clause == other.where_clause
            && self.group_by == other.group_by
            && self.having == other.having
            && self.windows == other.windows
            && self.locking == other.locking
    }
}

impl SimpleSelect {
    /// An empty `SELECT` with no projection and no `FROM`, for incremental
    /// construction by the parser and by transformers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            distinct: Distinct::All,
            projection: Vec::new(),
            from: Vec::new(),
            where_clause: None,
            group_by: GroupByClause::None,
            having: None,
            windows: Vec::new(),
            locking: None,
            span: Span::new(0, 0),
        }
    }
}

/// A set operator joining two query bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union { all: bool },
    Intersect { all: bool },
    Except { all: bool },
}

/// A `left OP right` set-operation node. Explicit parenthesization around
/// either operand is represented structurally via [`QueryBody::Paren`], not
/// as a flag here, so `(a UNION b) UNION c` and `a UNION (b UNION c)` stay
/// distinguishable after parsing left-associatively.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOperationSelect {
    pub left: Box<QueryBody>,
    pub op: SetOperator,
    pub right: Box<QueryBody>,
}

/// A `VALUES (...), (...)` row source used as a standalone query body.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesQuery {
    pub rows: Vec<Vec<Expr>>,
}

/// The body of a query: a single `SELECT`, a set operation tree, a `VALUES`
/// list, or an explicitly parenthesized full query (which may carry its own
/// `ORDER BY`/`LIMIT`, as in `(SELECT ... ORDER BY x) UNION SELECT ...`).
#[derive(Debug, Clone, PartialEq)]
pub enum QueryBody {
    Select(Box<SimpleSelect>),
    SetOp(Box<SetOperationSelect>),
    Values(ValuesQuery),
    Paren(Box<QueryAst>),
}

/// A single entry in a `WITH` clause.
#[derive(Debug, Clone)]
pub struct Cte {
    pub name: Ident,
    pub columns: Vec<Ident>,
    pub query: Box<QueryAst>,
    pub span: Span,
}

impl PartialEq for Cte {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.columns == other.columns && self.query == other.query
    }
}

/// A `WITH [RECURSIVE] cte, ...` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub recursive: bool,
    pub ctes: Vec<Cte>,
}

/// `FETCH {FIRST|NEXT} n {ROW|ROWS} {ONLY|WITH TIES}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchClause {
    pub count: Expr,
    pub with_ties: bool,
}

/// The root of a parsed query: an optional `WITH` prefix wrapping a body,
/// followed by the outer `ORDER BY`/`LIMIT`/`OFFSET`/`FETCH` clauses that
/// apply to the body as a whole. A subquery parses as a full `QueryAst`, so
/// it may carry its own nested `WITH`.
#[derive(Debug, Clone)]
pub struct QueryAst {
    pub with: Option<WithClause>,
    pub body: QueryBody,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub fetch: Option<FetchClause>,
    pub span: Span,
}

impl PartialEq for QueryAst {
    fn eq(&self, other: &Self) -> bool {
        self.with == other.with
            && self.body == other.body
            && self.order_by == other.order_by
            && self.limit == other.limit
            && self.offset == other.offset
            && self.fetch == other.fetch
    }
}

impl QueryAst {
    /// Wraps a bare `SELECT` body with no modifiers, for tests and
    /// transformers that build ASTs directly.
    #[must_use]
    pub fn simple(select: SimpleSelect) -> Self {
        Self {
            with: None,
            body: QueryBody::Select(Box::new(select)),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            fetch: None,
            span: Span::new(0, 0),
        }
    }

    /// The innermost [`SimpleSelect`], if this query's body (after
    /// unwrapping any explicit parens) is a plain `SELECT` rather than a set
    /// operation or `VALUES` list.
    #[must_use]
    pub fn as_simple_select(&self) -> Option<&SimpleSelect> {
        match &self.body {
            QueryBody::Select(s) => Some(s),
            QueryBody::Paren(inner) => inner.as_simple_select(),
            _ => None,
        }
    }

    /// Mutable access to the innermost [`SimpleSelect`], if any.
    pub fn as_simple_select_mut(&mut self) -> Option<&mut SimpleSelect> {
        match &mut self.body {
            QueryBody::Select(s) => Some(s),
            QueryBody::Paren(inner) => inner.as_simple_select_mut(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Literal;
    use crate::ast::expression::ExprKind;

    #[test]
    fn query_equality_ignores_span() {
        let mut a = QueryAst::simple(SimpleSelect::empty());
        a.span = Span::new(0, 10);
        let mut b = QueryAst::simple(SimpleSelect::empty());
        b.span = Span::new(20, 30);
        assert_eq!(a, b);
    }

    #[test]
    fn as_simple_select_unwraps_parens() {
        let inner = QueryAst::simple(SimpleSelect::empty());
        let query = QueryAst {
            with: None,
            body: QueryBody::Paren(Box::new(inner)),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            fetch: None,
            span: Span::new(0, 0),
        };
        assert!(query.as_simple_select().is_some());
    }

    #[test]
    fn as_simple_select_none_for_set_operation() {
        let left = QueryBody::Select(Box::new(SimpleSelect::empty()));
        let right = QueryBody::Select(Box::new(SimpleSelect::empty()));
        let query = QueryAst::simple(SimpleSelect::empty());
        let mut query = query;
        query.body = QueryBody::SetOp(Box::new(SetOperationSelect {
            left: Box::new(left),
            op: SetOperator::Union { all: true },
            right: Box::new(right),
        }));
        assert!(query.as_simple_select().is_none());
    }

    #[test]
    fn group_by_empty_only_for_none_variant() {
        assert!(GroupByClause::None.is_empty());
        assert!(!GroupByClause::Exprs(vec![Expr::column("a")]).is_empty());
    }

    #[test]
    fn values_query_rows() {
        let values = ValuesQuery {
            rows: vec![vec![Expr::integer(1), Expr::integer(2)]],
        };
        assert_eq!(values.rows.len(), 1);
        assert!(matches!(
            values.rows[0][0].kind,
            ExprKind::Literal(Literal::Integer(1))
        ));
    }
}
