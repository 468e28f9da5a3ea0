//! AppendWhere: ANDs an additional predicate onto a `SimpleSelect`'s WHERE.

use crate::ast::SimpleSelect;
use crate::ast::{BinaryOp, Expr, ExprKind};
use crate::dialect::Dialect;
use crate::parser::{ParseError, Parser};

/// Adds `predicate` to `select`'s WHERE clause, ANDing it onto any existing
/// predicate (or becoming the sole predicate if WHERE was absent). Existing
/// predicates are never reordered and no other clause is touched. An
/// OR-rooted existing predicate is parenthesized before the AND is attached,
/// since AND binds tighter than OR and an unparenthesized `a OR b AND new`
/// would reformat into a different predicate than the intended
/// `(a OR b) AND new`.
pub fn append_where(select: &mut SimpleSelect, predicate: Expr) {
    select.where_clause = Some(match select.where_clause.take() {
        Some(existing) => {
            let existing = if matches!(existing.kind, ExprKind::Binary { op: BinaryOp::Or, .. }) {
                existing.paren()
            } else {
                existing
            };
            existing.and(predicate)
        }
        None => predicate,
    });
}

/// Like [`append_where`], but parses `fragment` as a standalone expression
/// using the same parser (and dialect) the rest of the query came from, so
/// callers can splice in a raw SQL predicate string. The fragment's
/// unqualified column references are left unqualified, preserving alias
/// scoping.
///
/// # Errors
///
/// Returns a [`ParseError`] if `fragment` is not exactly one expression.
pub fn append_where_sql(
    select: &mut SimpleSelect,
    fragment: &str,
    dialect: &dyn Dialect,
) -> Result<(), ParseError> {
    let predicate = Parser::parse_expr(fragment, dialect)?;
    append_where(select, predicate);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;

    const PG: PostgresDialect = PostgresDialect;

    #[test]
    fn adds_predicate_to_empty_where() {
        let mut select = SimpleSelect::empty();
        append_where(&mut select, Expr::column("active").eq(Expr::boolean(true)));
        assert!(select.where_clause.is_some());
    }

    #[test]
    fn ands_onto_existing_predicate_without_reordering() {
        let mut select = SimpleSelect::empty();
        let first = Expr::column("age").gt(Expr::integer(18));
        select.where_clause = Some(first.clone());
        append_where(&mut select, Expr::column("active").eq(Expr::boolean(true)));

        let crate::ast::ExprKind::Binary { left, op, .. } = &select.where_clause.as_ref().unwrap().kind
        else {
            panic!("expected a binary AND");
        };
        assert_eq!(*op, crate::ast::BinaryOp::And);
        assert_eq!(**left, first);
    }

    #[test]
    fn parenthesizes_an_or_rooted_existing_predicate_before_anding() {
        let mut select = SimpleSelect::empty();
        let existing = Expr::column("a")
            .eq(Expr::integer(1))
            .or(Expr::column("b").eq(Expr::integer(2)));
        select.where_clause = Some(existing);
        append_where(&mut select, Expr::column("c").eq(Expr::integer(3)));

        let crate::ast::ExprKind::Binary { left, op, right } =
            &select.where_clause.as_ref().unwrap().kind
        else {
            panic!("expected a binary AND");
        };
        assert_eq!(*op, crate::ast::BinaryOp::And);
        assert!(matches!(left.kind, crate::ast::ExprKind::Paren(_)));
        assert_eq!(right.kind, Expr::column("c").eq(Expr::integer(3)).kind);
    }

    #[test]
    fn append_where_sql_reparses_fragment() {
        let mut select = SimpleSelect::empty();
        append_where_sql(&mut select, "status = 'active'", &PG).unwrap();
        assert!(select.where_clause.is_some());
    }

    #[test]
    fn append_where_sql_rejects_multi_expression_fragments() {
        let mut select = SimpleSelect::empty();
        let err = append_where_sql(&mut select, "a = 1, b = 2", &PG);
        assert!(err.is_err());
    }
}
