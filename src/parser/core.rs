//! Recursive-descent parser with Pratt expression parsing.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, postfix_binding_power, prefix_binding_power, token_to_binary_op,
    token_to_unary_op,
};
use crate::ast::{
    BinaryOp, Cte, DataType, Distinct, Expr, ExprKind, FetchClause, FunctionArg, FunctionCall,
    GroupByClause, Ident, InList, JoinClause, JoinType, Literal, LockStrength, NamedWindow,
    NullOrdering, OrderByExpr, OrderDirection, ParamRef, QueryAst, QueryBody, SelectItem,
    SetOperationSelect, SetOperator, SimpleSelect, TableRef, UnaryOp, ValuesQuery, WindowFrame,
    WindowFrameBound, WindowFrameUnit, WindowRef, WindowSpec, WithClause,
};
use crate::dialect::Dialect;
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// A hand-written recursive-descent / Pratt parser for `SELECT`-shaped
/// queries, parameterized by dialect (keyword/operator acceptance only;
/// grammar shape is shared across dialects).
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    dialect: &'a dyn Dialect,
    current: Token,
    previous: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser positioned at the first token of `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the first token cannot be lexed.
    pub fn new(input: &'a str, dialect: &'a dyn Dialect) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input, dialect);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            dialect,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
        })
    }

    /// Parses a complete query and confirms the input is fully consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for any malformed or unsupported construct,
    /// or if trailing tokens remain after a complete query.
    pub fn parse(input: &'a str, dialect: &'a dyn Dialect) -> Result<QueryAst, ParseError> {
        let mut parser = Self::new(input, dialect)?;
        let query = parser.parse_query_ast()?;
        parser.finish()?;
        Ok(query)
    }

    /// Parses a standalone expression fragment, used by transformers (e.g.
    /// append-where) that accept a raw SQL predicate to splice into an
    /// existing tree rather than a pre-built [`Expr`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if `input` is not exactly one expression.
    pub fn parse_expr(input: &'a str, dialect: &'a dyn Dialect) -> Result<Expr, ParseError> {
        let mut parser = Self::new(input, dialect)?;
        let expr = parser.parse_expression(0)?;
        parser.finish()?;
        Ok(expr)
    }

    /// Consumes a trailing `;` if present and confirms nothing but `Eof`
    /// remains. Shared by [`Self::parse`] and the async entry point.
    pub(crate) fn finish(&mut self) -> Result<(), ParseError> {
        if self.check_kind(&TokenKind::Semicolon) {
            self.advance()?;
        }
        if !self.current.is_eof() {
            return Err(ParseError::unexpected(
                "end of input",
                self.current.kind.clone(),
                self.current.span,
            ));
        }
        Ok(())
    }

    // -- token plumbing -----------------------------------------------

    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        self.previous = core::mem::replace(&mut self.current, next);
        Ok(self.previous.clone())
    }

    fn check_kind(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.as_keyword() == Some(keyword)
    }

    fn match_keyword(&mut self, keyword: Keyword) -> Result<bool, ParseError> {
        if self.check_keyword(keyword) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance()?;
            Ok(())
        } else {
            Err(ParseError::unexpected(
                keyword.as_str(),
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    fn expect_kind(&mut self, kind: &TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.check_kind(kind) {
            self.advance()
        } else {
            Err(ParseError::unexpected(
                what,
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    fn expect_identifier_text(&mut self) -> Result<String, ParseError> {
        match self.current.kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => Err(ParseError::unexpected("identifier", other, self.current.span)),
        }
    }

    fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        match self.current.kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance()?;
                Ok(Ident::Unquoted(name))
            }
            TokenKind::QuotedIdentifier(name) => {
                self.advance()?;
                Ok(Ident::Quoted(name))
            }
            other => Err(ParseError::unexpected("identifier", other, self.current.span)),
        }
    }

    // -- top level ------------------------------------------------------

    pub(crate) fn parse_query_ast(&mut self) -> Result<QueryAst, ParseError> {
        let start = self.current.span;
        let with = if self.check_keyword(Keyword::With) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };

        let body = self.parse_query_body_expr()?;

        let order_by = if self.match_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            Vec::new()
        };

        let limit = if self.match_keyword(Keyword::Limit)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let offset = if self.match_keyword(Keyword::Offset)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let fetch = if self.check_keyword(Keyword::Fetch) {
            Some(self.parse_fetch_clause()?)
        } else {
            None
        };

        let end = self.previous.span;
        Ok(QueryAst {
            with,
            body,
            order_by,
            limit,
            offset,
            fetch,
            span: Span::new(start.start, end.end.max(start.end)),
        })
    }

    fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        self.expect_keyword(Keyword::With)?;
        let recursive = self.match_keyword(Keyword::Recursive)?;
        let mut ctes = vec![self.parse_cte()?];
        while self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            ctes.push(self.parse_cte()?);
        }
        Ok(WithClause { recursive, ctes })
    }

    fn parse_cte(&mut self) -> Result<Cte, ParseError> {
        let start = self.current.span;
        let name = self.parse_ident()?;
        let mut columns = Vec::new();
        if self.check_kind(&TokenKind::LeftParen) {
            self.advance()?;
            columns.push(self.parse_ident()?);
            while self.check_kind(&TokenKind::Comma) {
                self.advance()?;
                columns.push(self.parse_ident()?);
            }
            self.expect_kind(&TokenKind::RightParen, ")")?;
        }
        self.expect_keyword(Keyword::As)?;
        self.expect_kind(&TokenKind::LeftParen, "(")?;
        let query = self.parse_query_ast()?;
        self.expect_kind(&TokenKind::RightParen, ")")?;
        let end = self.previous.span;
        Ok(Cte {
            name,
            columns,
            query: Box::new(query),
            span: Span::new(start.start, end.end),
        })
    }

    fn parse_query_body_expr(&mut self) -> Result<QueryBody, ParseError> {
        let mut left = self.parse_query_term()?;
        loop {
            let op = if self.match_keyword(Keyword::Union)? {
                let all = self.match_keyword(Keyword::All)?;
                SetOperator::Union { all }
            } else if self.match_keyword(Keyword::Intersect)? {
                let all = self.match_keyword(Keyword::All)?;
                SetOperator::Intersect { all }
            } else if self.match_keyword(Keyword::Except)? {
                let all = self.match_keyword(Keyword::All)?;
                SetOperator::Except { all }
            } else {
                break;
            };
            let right = self.parse_query_term()?;
            left = QueryBody::SetOp(Box::new(SetOperationSelect {
                left: Box::new(left),
                op,
                right: Box::new(right),
            }));
        }
        Ok(left)
    }

    fn parse_query_term(&mut self) -> Result<QueryBody, ParseError> {
        if self.check_kind(&TokenKind::LeftParen) {
            self.advance()?;
            let inner = self.parse_query_ast()?;
            self.expect_kind(&TokenKind::RightParen, ")")?;
            return Ok(QueryBody::Paren(Box::new(inner)));
        }
        if self.check_keyword(Keyword::Values) {
            return Ok(QueryBody::Values(self.parse_values_query()?));
        }
        Ok(QueryBody::Select(Box::new(self.parse_simple_select()?)))
    }

    fn parse_values_query(&mut self) -> Result<ValuesQuery, ParseError> {
        self.expect_keyword(Keyword::Values)?;
        let mut rows = vec![self.parse_row_of_values()?];
        while self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            rows.push(self.parse_row_of_values()?);
        }
        Ok(ValuesQuery { rows })
    }

    fn parse_row_of_values(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_kind(&TokenKind::LeftParen, "(")?;
        let exprs = self.parse_expr_list()?;
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(exprs)
    }

    // -- SELECT -----------------------------------------------------------

    fn parse_simple_select(&mut self) -> Result<SimpleSelect, ParseError> {
        let start = self.current.span;
        self.expect_keyword(Keyword::Select)?;

        let distinct = self.parse_distinct()?;
        let projection = self.parse_projection()?;

        let from = if self.match_keyword(Keyword::From)? {
            self.parse_from_list()?
        } else {
            Vec::new()
        };

        let where_clause = if self.match_keyword(Keyword::Where)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let group_by = if self.match_keyword(Keyword::Group)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_group_by()?
        } else {
            GroupByClause::None
        };

        let having = if self.match_keyword(Keyword::Having)? {
            Some(self.parse_expression(0)?)
        } else {
            None
        };

        let windows = if self.match_keyword(Keyword::Window)? {
            self.parse_window_clause()?
        } else {
            Vec::new()
        };

        let locking = self.parse_locking_clause()?;

        let end = self.previous.span;
        Ok(SimpleSelect {
            distinct,
            projection,
            from,
            where_clause,
            group_by,
            having,
            windows,
            locking,
            span: Span::new(start.start, end.end.max(start.end)),
        })
    }

    fn parse_distinct(&mut self) -> Result<Distinct, ParseError> {
        if self.match_keyword(Keyword::Distinct)? {
            if self.match_keyword(Keyword::On)? {
                self.expect_kind(&TokenKind::LeftParen, "(")?;
                let exprs = self.parse_expr_list()?;
                self.expect_kind(&TokenKind::RightParen, ")")?;
                return Ok(Distinct::On(exprs));
            }
            return Ok(Distinct::Distinct);
        }
        self.match_keyword(Keyword::All)?;
        Ok(Distinct::All)
    }

    fn parse_projection(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        let mut items = vec![self.parse_select_item()?];
        while self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            items.push(self.parse_select_item()?);
        }
        Ok(items)
    }

    fn parse_select_item(&mut self) -> Result<SelectItem, ParseError> {
        if self.check_kind(&TokenKind::Star) {
            self.advance()?;
            return Ok(SelectItem::Wildcard { table: None });
        }
        let expr = self.parse_expression(0)?;
        if let ExprKind::Wildcard { table } = &expr.kind {
            return Ok(SelectItem::Wildcard {
                table: table.clone(),
            });
        }
        let alias = self.parse_optional_alias()?;
        Ok(SelectItem::Expr { expr, alias })
    }

    fn parse_optional_alias(&mut self) -> Result<Option<Ident>, ParseError> {
        if self.match_keyword(Keyword::As)? {
            return Ok(Some(self.parse_ident()?));
        }
        if matches!(
            self.current.kind,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        ) {
            return Ok(Some(self.parse_ident()?));
        }
        Ok(None)
    }

    fn parse_group_by(&mut self) -> Result<GroupByClause, ParseError> {
        if self.match_keyword(Keyword::Grouping)? {
            self.expect_keyword(Keyword::Sets)?;
            self.expect_kind(&TokenKind::LeftParen, "(")?;
            let mut sets = vec![self.parse_grouping_set_element()?];
            while self.check_kind(&TokenKind::Comma) {
                self.advance()?;
                sets.push(self.parse_grouping_set_element()?);
            }
            self.expect_kind(&TokenKind::RightParen, ")")?;
            return Ok(GroupByClause::GroupingSets(sets));
        }
        if self.match_keyword(Keyword::Rollup)? {
            self.expect_kind(&TokenKind::LeftParen, "(")?;
            let exprs = self.parse_expr_list()?;
            self.expect_kind(&TokenKind::RightParen, ")")?;
            return Ok(GroupByClause::Rollup(exprs));
        }
        if self.match_keyword(Keyword::Cube)? {
            self.expect_kind(&TokenKind::LeftParen, "(")?;
            let exprs = self.parse_expr_list()?;
            self.expect_kind(&TokenKind::RightParen, ")")?;
            return Ok(GroupByClause::Cube(exprs));
        }
        Ok(GroupByClause::Exprs(self.parse_expr_list()?))
    }

    fn parse_grouping_set_element(&mut self) -> Result<Vec<Expr>, ParseError> {
        if self.check_kind(&TokenKind::LeftParen) {
            self.advance()?;
            if self.check_kind(&TokenKind::RightParen) {
                self.advance()?;
                return Ok(Vec::new());
            }
            let exprs = self.parse_expr_list()?;
            self.expect_kind(&TokenKind::RightParen, ")")?;
            Ok(exprs)
        } else {
            Ok(vec![self.parse_expression(0)?])
        }
    }

    fn parse_window_clause(&mut self) -> Result<Vec<NamedWindow>, ParseError> {
        let mut windows = vec![self.parse_named_window()?];
        while self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            windows.push(self.parse_named_window()?);
        }
        Ok(windows)
    }

    fn parse_named_window(&mut self) -> Result<NamedWindow, ParseError> {
        let name = self.expect_identifier_text()?;
        self.expect_keyword(Keyword::As)?;
        self.expect_kind(&TokenKind::LeftParen, "(")?;
        let spec = self.parse_window_spec_body()?;
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(NamedWindow { name, spec })
    }

    fn parse_window_spec_body(&mut self) -> Result<WindowSpec, ParseError> {
        let base_window = if matches!(self.current.kind, TokenKind::Identifier(_))
            && !self.check_keyword(Keyword::Partition)
            && !self.check_keyword(Keyword::Order)
        {
            Some(self.expect_identifier_text()?)
        } else {
            None
        };

        let partition_by = if self.match_keyword(Keyword::Partition)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        let order_by = if self.match_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            Vec::new()
        };

        let frame = if self.check_keyword(Keyword::Rows)
            || self.check_keyword(Keyword::Range)
            || self.check_keyword(Keyword::Groups)
        {
            Some(self.parse_window_frame()?)
        } else {
            None
        };

        Ok(WindowSpec {
            base_window,
            partition_by,
            order_by,
            frame,
        })
    }

    fn parse_window_frame(&mut self) -> Result<WindowFrame, ParseError> {
        let unit = if self.match_keyword(Keyword::Rows)? {
            WindowFrameUnit::Rows
        } else if self.match_keyword(Keyword::Range)? {
            WindowFrameUnit::Range
        } else {
            self.expect_keyword(Keyword::Groups)?;
            WindowFrameUnit::Groups
        };

        if self.match_keyword(Keyword::Between)? {
            let start = self.parse_window_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            let end = self.parse_window_frame_bound()?;
            Ok(WindowFrame {
                unit,
                start,
                end: Some(end),
            })
        } else {
            let start = self.parse_window_frame_bound()?;
            Ok(WindowFrame {
                unit,
                start,
                end: None,
            })
        }
    }

    fn parse_window_frame_bound(&mut self) -> Result<WindowFrameBound, ParseError> {
        if self.match_keyword(Keyword::Unbounded)? {
            return if self.match_keyword(Keyword::Preceding)? {
                Ok(WindowFrameBound::UnboundedPreceding)
            } else {
                self.expect_keyword(Keyword::Following)?;
                Ok(WindowFrameBound::UnboundedFollowing)
            };
        }
        if self.match_keyword(Keyword::Current)? {
            self.expect_keyword(Keyword::Row)?;
            return Ok(WindowFrameBound::CurrentRow);
        }
        let expr = self.parse_expression(0)?;
        if self.match_keyword(Keyword::Preceding)? {
            Ok(WindowFrameBound::Preceding(Box::new(expr)))
        } else {
            self.expect_keyword(Keyword::Following)?;
            Ok(WindowFrameBound::Following(Box::new(expr)))
        }
    }

    fn parse_locking_clause(&mut self) -> Result<Option<LockStrength>, ParseError> {
        if self.match_keyword(Keyword::For)? {
            if self.match_keyword(Keyword::Update)? {
                return Ok(Some(LockStrength::Update));
            }
            self.expect_keyword(Keyword::Share)?;
            return Ok(Some(LockStrength::Share));
        }
        Ok(None)
    }

    fn parse_fetch_clause(&mut self) -> Result<FetchClause, ParseError> {
        self.expect_keyword(Keyword::Fetch)?;
        if self.match_keyword(Keyword::First)? {
        } else {
            self.expect_keyword(Keyword::Next)?;
        }
        let count = self.parse_expression(0)?;
        if !self.match_keyword(Keyword::Row)? {
            self.expect_keyword(Keyword::Rows)?;
        }
        let with_ties = if self.match_keyword(Keyword::Only)? {
            false
        } else {
            self.expect_keyword(Keyword::With)?;
            self.expect_keyword(Keyword::Ties)?;
            true
        };
        Ok(FetchClause { count, with_ties })
    }

    fn parse_order_by_list(&mut self) -> Result<Vec<OrderByExpr>, ParseError> {
        let mut items = vec![self.parse_order_by_item()?];
        while self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            items.push(self.parse_order_by_item()?);
        }
        Ok(items)
    }

    fn parse_order_by_item(&mut self) -> Result<OrderByExpr, ParseError> {
        let expr = self.parse_expression(0)?;
        let direction = if self.match_keyword(Keyword::Asc)? {
            OrderDirection::Asc
        } else if self.match_keyword(Keyword::Desc)? {
            OrderDirection::Desc
        } else {
            OrderDirection::Asc
        };
        let nulls = if self.match_keyword(Keyword::Nulls)? {
            if self.match_keyword(Keyword::First)? {
                Some(NullOrdering::First)
            } else {
                self.expect_keyword(Keyword::Last)?;
                Some(NullOrdering::Last)
            }
        } else {
            None
        };
        Ok(OrderByExpr {
            expr,
            direction,
            nulls,
        })
    }

    // -- FROM / JOIN --------------------------------------------------

    fn parse_from_list(&mut self) -> Result<Vec<TableRef>, ParseError> {
        let mut items = vec![self.parse_table_ref_with_joins()?];
        while self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            items.push(self.parse_table_ref_with_joins()?);
        }
        Ok(items)
    }

    fn parse_table_ref_with_joins(&mut self) -> Result<TableRef, ParseError> {
        let mut left = self.parse_table_primary()?;
        loop {
            let natural = self.match_keyword(Keyword::Natural)?;
            let join_type = if self.match_keyword(Keyword::Join)? {
                JoinType::Inner
            } else if self.match_keyword(Keyword::Inner)? {
                self.expect_keyword(Keyword::Join)?;
                JoinType::Inner
            } else if self.match_keyword(Keyword::Left)? {
                self.match_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinType::Left
            } else if self.match_keyword(Keyword::Right)? {
                self.match_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinType::Right
            } else if self.match_keyword(Keyword::Full)? {
                self.match_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinType::Full
            } else if self.match_keyword(Keyword::Cross)? {
                self.expect_keyword(Keyword::Join)?;
                JoinType::Cross
            } else {
                break;
            };

            let table = self.parse_table_primary()?;

            let (on, using) = if natural || join_type == JoinType::Cross {
                (None, Vec::new())
            } else if self.match_keyword(Keyword::On)? {
                (Some(self.parse_expression(0)?), Vec::new())
            } else if self.match_keyword(Keyword::Using)? {
                self.expect_kind(&TokenKind::LeftParen, "(")?;
                let mut cols = vec![self.parse_ident()?];
                while self.check_kind(&TokenKind::Comma) {
                    self.advance()?;
                    cols.push(self.parse_ident()?);
                }
                self.expect_kind(&TokenKind::RightParen, ")")?;
                (None, cols)
            } else {
                (None, Vec::new())
            };

            left = TableRef::Join {
                left: Box::new(left),
                join: Box::new(JoinClause {
                    join_type,
                    natural,
                    table,
                    on,
                    using,
                }),
            };
        }
        Ok(left)
    }

    fn parse_table_primary(&mut self) -> Result<TableRef, ParseError> {
        let lateral = self.match_keyword(Keyword::Lateral)?;

        if self.check_kind(&TokenKind::LeftParen) {
            self.advance()?;
            if self.check_keyword(Keyword::Values) {
                let values = self.parse_values_query()?;
                self.expect_kind(&TokenKind::RightParen, ")")?;
                self.match_keyword(Keyword::As)?;
                let alias = self.parse_ident()?;
                let columns = self.parse_optional_column_alias_list()?;
                return Ok(TableRef::ValuesTable {
                    rows: values.rows,
                    alias,
                    columns,
                });
            }
            let query = self.parse_query_ast()?;
            self.expect_kind(&TokenKind::RightParen, ")")?;
            self.match_keyword(Keyword::As)?;
            let alias = self.parse_ident()?;
            return Ok(TableRef::Subquery {
                query: Box::new(query),
                alias,
                lateral,
            });
        }

        let first = self.parse_ident()?;
        let (schema, name) = if self.check_kind(&TokenKind::Dot) {
            self.advance()?;
            (Some(first), self.parse_ident()?)
        } else {
            (None, first)
        };
        let alias = self.parse_optional_alias()?;
        Ok(TableRef::Table {
            schema,
            name,
            alias,
        })
    }

    fn parse_optional_column_alias_list(&mut self) -> Result<Vec<Ident>, ParseError> {
        if !self.check_kind(&TokenKind::LeftParen) {
            return Ok(Vec::new());
        }
        self.advance()?;
        let mut cols = vec![self.parse_ident()?];
        while self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            cols.push(self.parse_ident()?);
        }
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(cols)
    }

    // -- expressions ----------------------------------------------------

    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expression(0)?];
        while self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            exprs.push(self.parse_expression(0)?);
        }
        Ok(exprs)
    }

    /// Pratt-parses an expression, stopping once the next infix/postfix
    /// operator's left binding power is below `min_bp`.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_prefix()?;

        loop {
            if self.check_kind(&TokenKind::DoubleColon) {
                let bp = postfix_binding_power(&TokenKind::DoubleColon).unwrap();
                if bp < min_bp {
                    break;
                }
                left = self.parse_postfix(left)?;
                continue;
            }

            if self.check_keyword(Keyword::Not) {
                // lookahead for `NOT IN` / `NOT BETWEEN` / `NOT LIKE` / `NOT ILIKE`
                let span = self.current.span;
                self.advance()?;
                left = self.parse_negatable_predicate(left, span)?;
                continue;
            }

            if self.check_keyword(Keyword::In) {
                let (lbp, _) = infix_binding_power(&self.current.kind).unwrap();
                if lbp < min_bp {
                    break;
                }
                self.advance()?;
                left = self.parse_in_predicate(left, false)?;
                continue;
            }

            if self.check_keyword(Keyword::Between) {
                let (lbp, _) = infix_binding_power(&self.current.kind).unwrap();
                if lbp < min_bp {
                    break;
                }
                self.advance()?;
                left = self.parse_between_predicate(left, false)?;
                continue;
            }

            if self.check_keyword(Keyword::Is) {
                let (lbp, _) = infix_binding_power(&self.current.kind).unwrap();
                if lbp < min_bp {
                    break;
                }
                self.advance()?;
                left = self.parse_is_predicate(left)?;
                continue;
            }

            let Some((lbp, rbp)) = infix_binding_power(&self.current.kind) else {
                break;
            };
            if lbp < min_bp {
                break;
            }
            let Some(op) = token_to_binary_op(&self.current.kind) else {
                break;
            };
            self.advance()?;
            let right = self.parse_expression(rbp)?;
            left = Expr::without_span(ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_postfix(&mut self, left: Expr) -> Result<Expr, ParseError> {
        // Only `::` is registered as postfix today.
        self.advance()?; // consume `::`
        let data_type = self.parse_data_type()?;
        Ok(Expr::without_span(ExprKind::Cast {
            expr: Box::new(left),
            data_type,
        }))
    }

    fn parse_negatable_predicate(&mut self, left: Expr, not_span: Span) -> Result<Expr, ParseError> {
        if self.match_keyword(Keyword::In)? {
            return self.parse_in_predicate(left, true);
        }
        if self.match_keyword(Keyword::Between)? {
            return self.parse_between_predicate(left, true);
        }
        if self.match_keyword(Keyword::Like)? {
            let right = self.parse_expression(6)?;
            return Ok(Expr::without_span(ExprKind::Binary {
                left: Box::new(left),
                op: crate::ast::BinaryOp::NotLike,
                right: Box::new(right),
            }));
        }
        if self.match_keyword(Keyword::Ilike)? {
            let right = self.parse_expression(6)?;
            return Ok(Expr::without_span(ExprKind::Binary {
                left: Box::new(left),
                op: crate::ast::BinaryOp::NotILike,
                right: Box::new(right),
            }));
        }
        Err(ParseError::unexpected(
            "IN, BETWEEN, LIKE, or ILIKE after NOT",
            self.current.kind.clone(),
            not_span,
        ))
    }

    fn parse_in_predicate(&mut self, left: Expr, negated: bool) -> Result<Expr, ParseError> {
        self.expect_kind(&TokenKind::LeftParen, "(")?;
        let list = if self.check_keyword(Keyword::Select) {
            let query = self.parse_simple_select_as_query()?;
            InList::Subquery(Box::new(query))
        } else {
            InList::Exprs(self.parse_expr_list()?)
        };
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(Expr::without_span(ExprKind::In {
            expr: Box::new(left),
            list,
            negated,
        }))
    }

    fn parse_between_predicate(&mut self, left: Expr, negated: bool) -> Result<Expr, ParseError> {
        let low = self.parse_expression(7)?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_expression(7)?;
        Ok(Expr::without_span(ExprKind::Between {
            expr: Box::new(left),
            low: Box::new(low),
            high: Box::new(high),
            negated,
        }))
    }

    fn parse_is_predicate(&mut self, left: Expr) -> Result<Expr, ParseError> {
        let negated = self.match_keyword(Keyword::Not)?;
        self.expect_keyword(Keyword::Null)?;
        Ok(Expr::without_span(ExprKind::IsNull {
            expr: Box::new(left),
            negated,
        }))
    }

    fn parse_simple_select_as_query(&mut self) -> Result<QueryAst, ParseError> {
        let select = self.parse_simple_select()?;
        Ok(QueryAst::simple(select))
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;

        if let Some(op) = token_to_unary_op(&self.current.kind) {
            let bp = prefix_binding_power(&self.current.kind).unwrap_or(0);
            if matches!(
                self.current.kind,
                TokenKind::Minus | TokenKind::Plus | TokenKind::BitNot
            ) {
                self.advance()?;
                let operand = self.parse_expression(bp)?;
                return Ok(Expr::new(
                    ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    Span::new(start.start, self.previous.span.end),
                ));
            }
            if self.check_keyword(Keyword::Not) {
                self.advance()?;
                let operand = self.parse_expression(bp)?;
                return Ok(Expr::new(
                    ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    Span::new(start.start, self.previous.span.end),
                ));
            }
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        match self.current.kind.clone() {
            TokenKind::Integer(v) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Integer(v)), start))
            }
            TokenKind::Float(v) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Float(v)), start))
            }
            TokenKind::String(s) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::String(s)), start))
            }
            TokenKind::DollarString { tag, value } => {
                self.advance()?;
                Ok(Expr::new(
                    ExprKind::Literal(Literal::DollarString { tag, value }),
                    start,
                ))
            }
            TokenKind::AnonymousParameter => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Parameter(ParamRef::Anonymous), start))
            }
            TokenKind::NamedParameter(name) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Parameter(ParamRef::Named(name)), start))
            }
            TokenKind::AtParameter(name) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Parameter(ParamRef::At(name)), start))
            }
            TokenKind::PositionalParameter(n) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Parameter(ParamRef::Positional(n)), start))
            }
            TokenKind::Star => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Wildcard { table: None }, start))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Boolean(true)), start))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Boolean(false)), start))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Null), start))
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expr(start),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast_expr(start),
            TokenKind::Keyword(Keyword::Exists) => self.parse_exists_expr(start, false),
            TokenKind::Keyword(Keyword::Array) => self.parse_array_constructor(start),
            TokenKind::Keyword(Keyword::Row) => self.parse_row_constructor(start),
            TokenKind::LeftParen => self.parse_paren_expr(start),
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => self.parse_ident_led(start),
            other => Err(ParseError::unexpected(
                "an expression",
                other,
                self.current.span,
            )),
        }
    }

    fn parse_paren_expr(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.advance()?; // (
        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let query = self.parse_query_ast()?;
            self.expect_kind(&TokenKind::RightParen, ")")?;
            return Ok(Expr::new(
                ExprKind::Subquery(Box::new(query)),
                Span::new(start.start, self.previous.span.end),
            ));
        }
        let first = self.parse_expression(0)?;
        if self.check_kind(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.check_kind(&TokenKind::Comma) {
                self.advance()?;
                items.push(self.parse_expression(0)?);
            }
            self.expect_kind(&TokenKind::RightParen, ")")?;
            return Ok(Expr::new(
                ExprKind::Row(items),
                Span::new(start.start, self.previous.span.end),
            ));
        }
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(Expr::new(
            ExprKind::Paren(Box::new(first)),
            Span::new(start.start, self.previous.span.end),
        ))
    }

    fn parse_exists_expr(&mut self, start: Span, negated: bool) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Exists)?;
        self.expect_kind(&TokenKind::LeftParen, "(")?;
        let query = self.parse_query_ast()?;
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(Expr::new(
            ExprKind::Exists {
                subquery: Box::new(query),
                negated,
            },
            Span::new(start.start, self.previous.span.end),
        ))
    }

    fn parse_array_constructor(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Array)?;
        self.expect_kind(&TokenKind::LeftBracket, "[")?;
        let items = if self.check_kind(&TokenKind::RightBracket) {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        self.expect_kind(&TokenKind::RightBracket, "]")?;
        Ok(Expr::new(
            ExprKind::Array(items),
            Span::new(start.start, self.previous.span.end),
        ))
    }

    fn parse_row_constructor(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Row)?;
        self.expect_kind(&TokenKind::LeftParen, "(")?;
        let items = if self.check_kind(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(Expr::new(
            ExprKind::Row(items),
            Span::new(start.start, self.previous.span.end),
        ))
    }

    fn parse_case_expr(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression(0)?))
        };
        let mut when_clauses = Vec::new();
        while self.match_keyword(Keyword::When)? {
            let condition = self.parse_expression(0)?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression(0)?;
            when_clauses.push((condition, result));
        }
        let else_clause = if self.match_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(Expr::new(
            ExprKind::Case {
                operand,
                when_clauses,
                else_clause,
            },
            Span::new(start.start, self.previous.span.end),
        ))
    }

    fn parse_cast_expr(&mut self, start: Span) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect_kind(&TokenKind::LeftParen, "(")?;
        let expr = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(Expr::new(
            ExprKind::Cast {
                expr: Box::new(expr),
                data_type,
            },
            Span::new(start.start, self.previous.span.end),
        ))
    }

    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let base = match self.current.kind.clone() {
            TokenKind::Keyword(Keyword::Smallint) => {
                self.advance()?;
                DataType::Smallint
            }
            TokenKind::Keyword(Keyword::Integer | Keyword::Int) => {
                self.advance()?;
                DataType::Integer
            }
            TokenKind::Keyword(Keyword::Bigint) => {
                self.advance()?;
                DataType::Bigint
            }
            TokenKind::Keyword(Keyword::Real) => {
                self.advance()?;
                DataType::Real
            }
            TokenKind::Keyword(Keyword::Double) => {
                self.advance()?;
                self.match_keyword(Keyword::Precision)?;
                DataType::Double
            }
            TokenKind::Keyword(Keyword::Float) => {
                self.advance()?;
                DataType::Double
            }
            TokenKind::Keyword(Keyword::Decimal) => {
                self.advance()?;
                let (precision, scale) = self.parse_optional_precision_scale()?;
                DataType::Decimal { precision, scale }
            }
            TokenKind::Keyword(Keyword::Numeric) => {
                self.advance()?;
                let (precision, scale) = self.parse_optional_precision_scale()?;
                DataType::Numeric { precision, scale }
            }
            TokenKind::Keyword(Keyword::Char) => {
                self.advance()?;
                DataType::Char(self.parse_optional_length()?)
            }
            TokenKind::Keyword(Keyword::Varchar) => {
                self.advance()?;
                DataType::Varchar(self.parse_optional_length()?)
            }
            TokenKind::Keyword(Keyword::Text) => {
                self.advance()?;
                DataType::Text
            }
            TokenKind::Keyword(Keyword::Boolean) => {
                self.advance()?;
                DataType::Boolean
            }
            TokenKind::Keyword(Keyword::Date) => {
                self.advance()?;
                DataType::Date
            }
            TokenKind::Keyword(Keyword::Time) => {
                self.advance()?;
                DataType::Time
            }
            TokenKind::Keyword(Keyword::Timestamp) => {
                self.advance()?;
                let with_time_zone = if self.match_keyword(Keyword::With)? {
                    self.expect_identifier_text().ok();
                    true
                } else {
                    false
                };
                DataType::Timestamp { with_time_zone }
            }
            TokenKind::Keyword(Keyword::Datetime) => {
                self.advance()?;
                DataType::Datetime
            }
            TokenKind::Keyword(Keyword::Interval) => {
                self.advance()?;
                DataType::Interval
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                DataType::Custom(name)
            }
            other => return Err(ParseError::unexpected("a data type", other, self.current.span)),
        };

        if self.check_kind(&TokenKind::LeftBracket) {
            self.advance()?;
            self.expect_kind(&TokenKind::RightBracket, "]")?;
            return Ok(DataType::Array(Box::new(base)));
        }
        Ok(base)
    }

    fn parse_optional_length(&mut self) -> Result<Option<u32>, ParseError> {
        if !self.check_kind(&TokenKind::LeftParen) {
            return Ok(None);
        }
        self.advance()?;
        let TokenKind::Integer(n) = self.current.kind.clone() else {
            return Err(ParseError::unexpected(
                "an integer length",
                self.current.kind.clone(),
                self.current.span,
            ));
        };
        self.advance()?;
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok(Some(n as u32))
    }

    fn parse_optional_precision_scale(
        &mut self,
    ) -> Result<(Option<u16>, Option<u16>), ParseError> {
        if !self.check_kind(&TokenKind::LeftParen) {
            return Ok((None, None));
        }
        self.advance()?;
        let TokenKind::Integer(precision) = self.current.kind.clone() else {
            return Err(ParseError::unexpected(
                "a precision",
                self.current.kind.clone(),
                self.current.span,
            ));
        };
        self.advance()?;
        let scale = if self.check_kind(&TokenKind::Comma) {
            self.advance()?;
            let TokenKind::Integer(scale) = self.current.kind.clone() else {
                return Err(ParseError::unexpected(
                    "a scale",
                    self.current.kind.clone(),
                    self.current.span,
                ));
            };
            self.advance()?;
            Some(scale as u16)
        } else {
            None
        };
        self.expect_kind(&TokenKind::RightParen, ")")?;
        Ok((Some(precision as u16), scale))
    }

    /// Parses an identifier-led primary: a qualified column reference
    /// (`t.col`, `t.*`), or a function call.
    fn parse_ident_led(&mut self, start: Span) -> Result<Expr, ParseError> {
        let first = self.parse_ident()?;

        if self.check_kind(&TokenKind::Dot) {
            self.advance()?;
            if self.check_kind(&TokenKind::Star) {
                self.advance()?;
                return Ok(Expr::new(
                    ExprKind::Wildcard { table: Some(first) },
                    Span::new(start.start, self.previous.span.end),
                ));
            }
            let name = self.parse_ident()?;
            if self.check_kind(&TokenKind::LeftParen) {
                // schema-qualified function call, e.g. pg_catalog.lower(x)
                return self.parse_function_call_tail(name.name().to_string(), start);
            }
            return Ok(Expr::new(
                ExprKind::Column {
                    table: Some(first),
                    name,
                },
                Span::new(start.start, self.previous.span.end),
            ));
        }

        if self.check_kind(&TokenKind::LeftParen) {
            return self.parse_function_call_tail(first.name().to_string(), start);
        }

        Ok(Expr::new(
            ExprKind::Column {
                table: None,
                name: first,
            },
            Span::new(start.start, self.previous.span.end),
        ))
    }

    fn parse_function_call_tail(&mut self, name: String, start: Span) -> Result<Expr, ParseError> {
        self.expect_kind(&TokenKind::LeftParen, "(")?;

        let distinct = self.match_keyword(Keyword::Distinct)?;
        if !distinct {
            self.match_keyword(Keyword::All)?;
        }

        let mut args = Vec::new();
        if self.check_kind(&TokenKind::Star) {
            self.advance()?;
            args.push(FunctionArg::Wildcard);
        } else if !self.check_kind(&TokenKind::RightParen) {
            args.push(FunctionArg::Expr(self.parse_expression(0)?));
            while self.check_kind(&TokenKind::Comma) {
                self.advance()?;
                args.push(FunctionArg::Expr(self.parse_expression(0)?));
            }
        }

        let order_by = if self.match_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            Vec::new()
        };

        self.expect_kind(&TokenKind::RightParen, ")")?;

        let within_group = if self.match_keyword(Keyword::Within)? {
            self.expect_keyword(Keyword::Group)?;
            self.expect_kind(&TokenKind::LeftParen, "(")?;
            self.expect_keyword(Keyword::Order)?;
            self.expect_keyword(Keyword::By)?;
            let list = self.parse_order_by_list()?;
            self.expect_kind(&TokenKind::RightParen, ")")?;
            list
        } else {
            Vec::new()
        };

        let filter = if self.match_keyword(Keyword::Filter)? {
            self.expect_kind(&TokenKind::LeftParen, "(")?;
            self.expect_keyword(Keyword::Where)?;
            let expr = self.parse_expression(0)?;
            self.expect_kind(&TokenKind::RightParen, ")")?;
            Some(Box::new(expr))
        } else {
            None
        };

        let over = if self.match_keyword(Keyword::Over)? {
            if self.check_kind(&TokenKind::LeftParen) {
                self.advance()?;
                let spec = self.parse_window_spec_body()?;
                self.expect_kind(&TokenKind::RightParen, ")")?;
                Some(WindowRef::Inline(spec))
            } else {
                Some(WindowRef::Named(self.expect_identifier_text()?))
            }
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::Function(FunctionCall {
                name,
                args,
                distinct,
                order_by,
                within_group,
                filter,
                over,
            }),
            Span::new(start.start, self.previous.span.end),
        ))
    }
}
