//! FROM-clause and JOIN AST types.

use super::expression::{Expr, Ident};
use super::query::QueryAst;

/// Join kind (the `NATURAL` modifier and `USING`/`ON` condition are carried
/// separately on [`JoinClause`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN clause attached to a preceding [`TableRef`].
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    /// `NATURAL` prefix; mutually exclusive with `on`/`using`.
    pub natural: bool,
    pub table: TableRef,
    pub on: Option<Expr>,
    pub using: Vec<Ident>,
}

/// A table reference appearing in a `FROM` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A simple (possibly schema-qualified) table name.
    Table {
        schema: Option<Ident>,
        name: Ident,
        alias: Option<Ident>,
    },
    /// A derived table, i.e. `(SELECT ...) AS alias`.
    Subquery {
        query: Box<QueryAst>,
        alias: Ident,
        /// `LATERAL (SELECT ...)`.
        lateral: bool,
    },
    /// `VALUES (...), (...) AS alias(col, ...)` used as a row source.
    ValuesTable {
        rows: Vec<Vec<Expr>>,
        alias: Ident,
        columns: Vec<Ident>,
    },
    /// A chain built up left-to-right: `left JOIN ...`.
    Join {
        left: Box<TableRef>,
        join: Box<JoinClause>,
    },
}

impl TableRef {
    /// Creates a simple table reference.
    #[must_use]
    pub fn table(name: impl Into<Ident>) -> Self {
        Self::Table {
            schema: None,
            name: name.into(),
            alias: None,
        }
    }

    /// Creates a table reference with a schema qualifier.
    #[must_use]
    pub fn with_schema(schema: impl Into<Ident>, name: impl Into<Ident>) -> Self {
        Self::Table {
            schema: Some(schema.into()),
            name: name.into(),
            alias: None,
        }
    }

    /// Adds an alias to this table reference (or to the rightmost table in a
    /// join chain).
    #[must_use]
    pub fn alias(self, alias: impl Into<Ident>) -> Self {
        match self {
            Self::Table { schema, name, .. } => Self::Table {
                schema,
                name,
                alias: Some(alias.into()),
            },
            Self::Subquery { query, lateral, .. } => Self::Subquery {
                query,
                alias: alias.into(),
                lateral,
            },
            Self::ValuesTable { rows, columns, .. } => Self::ValuesTable {
                rows,
                alias: alias.into(),
                columns,
            },
            Self::Join { left, join } => Self::Join { left, join },
        }
    }

    /// The alias this reference presents to the enclosing query, if any.
    #[must_use]
    pub fn resolved_alias(&self) -> Option<&Ident> {
        match self {
            Self::Table { alias, name, .. } => alias.as_ref().or(Some(name)),
            Self::Subquery { alias, .. } | Self::ValuesTable { alias, .. } => Some(alias),
            Self::Join { left, .. } => left.resolved_alias(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_ref_builder() {
        let table = TableRef::table("users").alias("u");
        assert!(
            matches!(&table, TableRef::Table { name, alias, .. } if name.name() == "users" && alias.as_ref().map(Ident::name) == Some("u"))
        );
    }

    #[test]
    fn resolved_alias_falls_back_to_table_name() {
        let table = TableRef::table("users");
        assert_eq!(table.resolved_alias().map(Ident::name), Some("users"));
    }

    #[test]
    fn join_type_as_str() {
        assert_eq!(JoinType::Inner.as_str(), "INNER JOIN");
        assert_eq!(JoinType::Left.as_str(), "LEFT JOIN");
    }
}
