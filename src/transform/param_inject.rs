//! Parameter injection: appends `AND name = :name` predicates for a set of
//! caller-supplied values, resolved against the query's visible columns.

use crate::ast::{Expr, ExprKind, Ident, ParamRef, SelectItem, SimpleSelect};

use super::append_where::append_where;
use super::error::InjectError;

/// A literal value bound to an injected parameter. Kept separate from
/// [`crate::ast::Literal`] since an injected value is host data, not
/// something that was ever lexed from SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Null,
}

/// An ordered `name -> value` map of parameter bindings, populated by
/// [`inject`] and later consumed by the formatter to produce the `params`
/// payload. Order of insertion is preserved (this crate has no dependency on
/// an indexmap-style crate, so it's a plain ordered `Vec` instead).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBindings(Vec<(String, ParamValue)>);

impl ParamBindings {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.push((name.into(), value));
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Looks up the value bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn scope_has(select: &SimpleSelect, name: &str) -> bool {
    let matches_ident = |ident: &Ident| -> bool {
        match ident {
            Ident::Quoted(s) => s == name,
            Ident::Unquoted(s) => s.eq_ignore_ascii_case(name),
        }
    };

    let in_projection = select.projection.iter().any(|item| match item {
        SelectItem::Wildcard { .. } => false,
        SelectItem::Expr { expr, alias } => {
            alias.as_ref().is_some_and(&matches_ident)
                || matches!(&expr.kind, ExprKind::Column { name: col, .. } if matches_ident(col))
        }
    });

    // No live schema catalog is tracked anywhere in this crate (see the
    // crate's Non-goals), so a non-empty FROM is treated as sufficient
    // evidence the name could be one of its columns; only a FROM-less query
    // with no matching projection alias fails resolution outright.
    in_projection || !select.from.is_empty()
}

/// Appends `AND name = :name` to `select`'s WHERE for each `(name, value)`
/// pair in `injections`, in iteration order, recording each value in
/// `bindings`. Fails on the first name that cannot be resolved to a column
/// in scope.
///
/// # Errors
///
/// Returns [`InjectError`] naming the first unresolved parameter.
pub fn inject(
    select: &mut SimpleSelect,
    injections: &[(String, ParamValue)],
    bindings: &mut ParamBindings,
) -> Result<(), InjectError> {
    for (name, value) in injections {
        if !scope_has(select, name) {
            return Err(InjectError { name: name.clone() });
        }
        let predicate = Expr::without_span(ExprKind::Binary {
            left: Box::new(Expr::column(name.as_str())),
            op: crate::ast::BinaryOp::Eq,
            right: Box::new(Expr::without_span(ExprKind::Parameter(ParamRef::Named(
                name.clone(),
            )))),
        });
        append_where(select, predicate);
        bindings.insert(name.clone(), value.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TableRef;

    fn select_with_projection(col: &str) -> SimpleSelect {
        let mut select = SimpleSelect::empty();
        select.projection.push(SelectItem::Expr {
            expr: Expr::column(col),
            alias: None,
        });
        select
    }

    #[test]
    fn injects_predicate_for_known_projection_column() {
        let mut select = select_with_projection("status");
        let mut bindings = ParamBindings::new();
        inject(
            &mut select,
            &[("status".into(), ParamValue::Text("active".into()))],
            &mut bindings,
        )
        .unwrap();

        assert!(select.where_clause.is_some());
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn resolves_case_insensitively_for_unquoted_names() {
        let mut select = select_with_projection("Status");
        let mut bindings = ParamBindings::new();
        inject(
            &mut select,
            &[("status".into(), ParamValue::Boolean(true))],
            &mut bindings,
        )
        .unwrap();
        assert!(select.where_clause.is_some());
    }

    #[test]
    fn fails_for_unresolvable_name_with_no_from() {
        let mut select = SimpleSelect::empty();
        let mut bindings = ParamBindings::new();
        let err = inject(
            &mut select,
            &[("ghost".into(), ParamValue::Null)],
            &mut bindings,
        )
        .unwrap_err();
        assert_eq!(err.name, "ghost");
    }

    #[test]
    fn succeeds_against_from_table_even_without_projection_match() {
        let mut select = SimpleSelect::empty();
        select.from.push(TableRef::table("users"));
        let mut bindings = ParamBindings::new();
        inject(
            &mut select,
            &[("id".into(), ParamValue::Integer(1))],
            &mut bindings,
        )
        .unwrap();
    }

    #[test]
    fn preserves_injection_order_in_bindings() {
        let mut select = SimpleSelect::empty();
        select.from.push(TableRef::table("users"));
        let mut bindings = ParamBindings::new();
        inject(
            &mut select,
            &[
                ("a".into(), ParamValue::Integer(1)),
                ("b".into(), ParamValue::Integer(2)),
            ],
            &mut bindings,
        )
        .unwrap();
        let names: Vec<&str> = bindings.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
