//! UnionAll merge: combines two query ASTs with the receiver on the left.

use crate::ast::{QueryAst, QueryBody, SetOperationSelect, SetOperator};
use crate::lexer::Span;

/// Wraps `ast` in [`QueryBody::Paren`] only when doing so is load-bearing:
/// it carries outer modifiers (`WITH`/`ORDER BY`/`LIMIT`/`OFFSET`/`FETCH`)
/// that would otherwise be dropped, or its body is itself a set operation
/// that needs grouping to read unambiguously next to the new one. An
/// already-parenthesized body is passed through as-is rather than
/// double-wrapped. A plain `SELECT`/`VALUES` body with no modifiers is
/// embedded directly with no parens at all.
fn as_operand(ast: QueryAst) -> QueryBody {
    if ast.with.is_some()
        || !ast.order_by.is_empty()
        || ast.limit.is_some()
        || ast.offset.is_some()
        || ast.fetch.is_some()
    {
        return QueryBody::Paren(Box::new(ast));
    }
    match ast.body {
        body @ QueryBody::Paren(_) => body,
        body @ QueryBody::SetOp(_) => QueryBody::Paren(Box::new(QueryAst {
            with: None,
            body,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            fetch: None,
            span: Span::new(0, 0),
        })),
        body => body,
    }
}

/// Combines `left` and `right` into `left UNION ALL right`. Neither side's
/// column list is rewritten — callers are responsible for shape
/// compatibility. Associativity is left: chaining `union_all` calls nests
/// the growing tree on the left, matching how the parser builds a chain of
/// `UNION` keywords. Each operand is parenthesized only when needed (see
/// [`as_operand`]), so `union_all(union_all(a, b), c)` formats as
/// `(a UNION ALL b) UNION ALL c`, not `((a) UNION ALL (b)) UNION ALL (c)`.
#[must_use]
pub fn union_all(left: QueryAst, right: QueryAst) -> QueryAst {
    QueryAst {
        with: None,
        body: QueryBody::SetOp(Box::new(SetOperationSelect {
            left: Box::new(as_operand(left)),
            op: SetOperator::Union { all: true },
            right: Box::new(as_operand(right)),
        })),
        order_by: Vec::new(),
        limit: None,
        offset: None,
        fetch: None,
        span: Span::new(0, 0),
    }
}
