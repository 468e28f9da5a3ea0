//! DTO column aliasing: wraps a query in an outer `SELECT` that renames its
//! columns to a caller-supplied set of output field names.

use crate::ast::{Expr, Ident, QueryAst, SelectItem, SimpleSelect, TableRef};

const DERIVED_TABLE_ALIAS: &str = "__dto";

/// Wraps `inner` unmodified in a derived table and projects `columns`
/// (ordered `(dtoField, sqlColumn)` pairs, in the order given) as
/// `sqlColumn AS "dtoField"` against it. `inner`'s own projection, `WHERE`,
/// `ORDER BY`, and every other clause are left untouched.
#[must_use]
pub fn alias_as_dto(inner: QueryAst, columns: &[(String, String)]) -> QueryAst {
    let projection = columns
        .iter()
        .map(|(dto_field, sql_column)| SelectItem::Expr {
            expr: Expr::column(sql_column.as_str()),
            alias: Some(Ident::quoted(dto_field.clone())),
        })
        .collect();

    let mut select = SimpleSelect::empty();
    select.projection = projection;
    select.from = vec![TableRef::Subquery {
        query: Box::new(inner),
        alias: Ident::unquoted(DERIVED_TABLE_ALIAS),
        lateral: false,
    }];

    QueryAst::simple(select)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;

    #[test]
    fn projects_columns_in_caller_order() {
        let inner = QueryAst::simple(SimpleSelect::empty());
        let outer = alias_as_dto(
            inner,
            &[
                ("userId".to_string(), "id".to_string()),
                ("displayName".to_string(), "name".to_string()),
            ],
        );

        let select = outer.as_simple_select().unwrap();
        assert_eq!(select.projection.len(), 2);

        let SelectItem::Expr { alias, .. } = &select.projection[0] else {
            panic!("expected an aliased expression");
        };
        assert_eq!(alias.as_ref().unwrap().name(), "userId");

        let SelectItem::Expr { alias, .. } = &select.projection[1] else {
            panic!("expected an aliased expression");
        };
        assert_eq!(alias.as_ref().unwrap().name(), "displayName");
    }

    #[test]
    fn quotes_dto_field_aliases() {
        let inner = QueryAst::simple(SimpleSelect::empty());
        let outer = alias_as_dto(inner, &[("userId".to_string(), "id".to_string())]);
        let select = outer.as_simple_select().unwrap();
        let SelectItem::Expr { alias, .. } = &select.projection[0] else {
            panic!("expected an aliased expression");
        };
        assert!(alias.as_ref().unwrap().is_quoted());
    }

    #[test]
    fn wraps_inner_query_unmodified_as_derived_table() {
        let mut inner = SimpleSelect::empty();
        inner.projection.push(SelectItem::Expr {
            expr: Expr::column("id"),
            alias: None,
        });
        inner.from.push(TableRef::table("users"));
        let inner_ast = QueryAst::simple(inner.clone());

        let outer = alias_as_dto(inner_ast, &[("userId".to_string(), "id".to_string())]);
        let outer_select = outer.as_simple_select().unwrap();
        let TableRef::Subquery { query, alias, lateral } = &outer_select.from[0] else {
            panic!("expected a derived table");
        };
        assert_eq!(alias.name(), "__dto");
        assert!(!lateral);
        assert_eq!(query.as_simple_select().unwrap(), &inner);
    }

    #[test]
    fn projected_expressions_reference_sql_column_names() {
        let inner = QueryAst::simple(SimpleSelect::empty());
        let outer = alias_as_dto(inner, &[("userId".to_string(), "id".to_string())]);
        let select = outer.as_simple_select().unwrap();
        let SelectItem::Expr { expr, .. } = &select.projection[0] else {
            panic!("expected an aliased expression");
        };
        assert!(matches!(&expr.kind, ExprKind::Column { name, .. } if name.name() == "id"));
    }
}
