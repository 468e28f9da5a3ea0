//! AST-to-SQL rendering.

use std::fmt::Write as _;

use crate::ast::{
    BinaryOp, Cte, Distinct, Expr, ExprKind, FetchClause, FunctionArg, FunctionCall,
    GroupByClause, Ident, InList, JoinClause, JoinType, Literal, LockStrength, NullOrdering,
    OrderByExpr, OrderDirection, ParamRef, QueryAst, QueryBody, SelectItem, SimpleSelect,
    TableRef, UnaryOp, WindowFrame, WindowFrameBound, WindowFrameUnit, WindowRef, WindowSpec,
};
use crate::dialect::{IdentifierQuoting, KeywordCase, PlaceholderStyle};
use crate::lexer::Keyword;
use crate::transform::{ParamBindings, ParamValue};

use super::error::FormatError;
use super::options::{FormatOptions, LineBreak};

/// The `params` half of a formatted query, shaped to match the requested
/// [`PlaceholderStyle`]: a name-keyed map for the named styles, an ordered
/// list for the positional ones.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamsPayload {
    Named(Vec<(String, ParamValue)>),
    Positional(Vec<ParamValue>),
}

/// The result of [`SqlFormatter::format`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedQuery {
    pub sql: String,
    pub params: ParamsPayload,
}

/// Renders a [`QueryAst`] back to SQL text. This is the sole entry point for
/// turning an AST into text — AST nodes deliberately do not implement
/// `Display` so that every rendering decision (case, quoting, placeholder
/// style) goes through one configurable path.
pub struct SqlFormatter;

impl SqlFormatter {
    /// Formats `ast` under `options`, resolving named placeholders against
    /// `bindings` (pass [`ParamBindings::new`] for a query with no known
    /// parameter values, e.g. one that has not gone through parameter
    /// injection).
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if `ast` violates an invariant the renderer
    /// relies on (e.g. an `IN` list with zero elements).
    pub fn format(
        ast: &QueryAst,
        options: &FormatOptions,
        bindings: &ParamBindings,
    ) -> Result<FormattedQuery, FormatError> {
        let mut writer = Writer::new(options);
        writer.write_query(ast)?;
        let params = writer.build_payload(bindings);
        Ok(FormattedQuery {
            sql: writer.buf,
            params,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SlotKey {
    Name(String),
    Position(u32),
    Anon(u64),
}

struct Writer<'a> {
    options: &'a FormatOptions,
    buf: String,
    slot_order: Vec<SlotKey>,
    anon_counter: u64,
}

impl<'a> Writer<'a> {
    fn new(options: &'a FormatOptions) -> Self {
        Self {
            options,
            buf: String::new(),
            slot_order: Vec::new(),
            anon_counter: 0,
        }
    }

    fn kw(&mut self, keyword: &str) {
        match self.options.keyword_case() {
            KeywordCase::Upper => self.buf.push_str(&keyword.to_ascii_uppercase()),
            KeywordCase::Lower => self.buf.push_str(&keyword.to_ascii_lowercase()),
            KeywordCase::Preserve => self.buf.push_str(keyword),
        }
    }

    /// Separates two top-level clauses (`SELECT` ... `FROM` ... `WHERE` ...).
    /// A single space when `indent` is zero; otherwise a line break in the
    /// configured style followed by the configured indent.
    fn clause_break(&mut self) {
        if self.options.single_line() {
            self.buf.push(' ');
        } else {
            match self.options.line_break {
                LineBreak::Lf => self.buf.push('\n'),
                LineBreak::CrLf => self.buf.push_str("\r\n"),
            }
            self.buf.push_str(&" ".repeat(self.options.indent));
        }
    }

    fn write_ident(&mut self, ident: &Ident) {
        if self.needs_quote(ident) {
            let (open, close) = self.options.quote_pair();
            self.buf.push(open);
            for ch in ident.name().chars() {
                if ch == close {
                    self.buf.push(close);
                }
                self.buf.push(ch);
            }
            self.buf.push(close);
        } else {
            self.buf.push_str(ident.name());
        }
    }

    fn needs_quote(&self, ident: &Ident) -> bool {
        match self.options.identifier_quoting() {
            IdentifierQuoting::Always => true,
            IdentifierQuoting::Never => false,
            IdentifierQuoting::WhenNeeded => {
                ident.is_quoted()
                    || Keyword::from_str(ident.name()).is_some()
                    || !is_plain_identifier(ident.name())
            }
        }
    }

    fn write_query(&mut self, ast: &QueryAst) -> Result<(), FormatError> {
        if let Some(with) = &ast.with {
            self.kw("WITH");
            if with.recursive {
                self.buf.push(' ');
                self.kw("RECURSIVE");
            }
            self.buf.push(' ');
            for (i, cte) in with.ctes.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.write_cte(cte)?;
            }
            self.clause_break();
        }

        self.write_query_body(&ast.body)?;

        if !ast.order_by.is_empty() {
            self.clause_break();
            self.kw("ORDER BY");
            self.buf.push(' ');
            self.write_order_by_list(&ast.order_by)?;
        }
        if let Some(limit) = &ast.limit {
            self.clause_break();
            self.kw("LIMIT");
            self.buf.push(' ');
            self.write_expr(limit)?;
        }
        if let Some(offset) = &ast.offset {
            self.clause_break();
            self.kw("OFFSET");
            self.buf.push(' ');
            self.write_expr(offset)?;
        }
        if let Some(fetch) = &ast.fetch {
            self.clause_break();
            self.write_fetch(fetch)?;
        }
        Ok(())
    }

    fn write_cte(&mut self, cte: &Cte) -> Result<(), FormatError> {
        self.write_ident(&cte.name);
        if !cte.columns.is_empty() {
            self.buf.push_str(" (");
            for (i, col) in cte.columns.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.write_ident(col);
            }
            self.buf.push(')');
        }
        self.buf.push(' ');
        self.kw("AS");
        self.buf.push_str(" (");
        self.write_query(&cte.query)?;
        self.buf.push(')');
        Ok(())
    }

    fn write_query_body(&mut self, body: &QueryBody) -> Result<(), FormatError> {
        match body {
            QueryBody::Select(select) => self.write_simple_select(select),
            QueryBody::SetOp(op) => {
                self.write_query_body(&op.left)?;
                self.clause_break();
                match op.op {
                    crate::ast::SetOperator::Union { all } => {
                        self.kw("UNION");
                        if all {
                            self.buf.push(' ');
                            self.kw("ALL");
                        }
                    }
                    crate::ast::SetOperator::Intersect { all } => {
                        self.kw("INTERSECT");
                        if all {
                            self.buf.push(' ');
                            self.kw("ALL");
                        }
                    }
                    crate::ast::SetOperator::Except { all } => {
                        self.kw("EXCEPT");
                        if all {
                            self.buf.push(' ');
                            self.kw("ALL");
                        }
                    }
                }
                self.clause_break();
                self.write_query_body(&op.right)
            }
            QueryBody::Values(values) => {
                self.kw("VALUES");
                self.buf.push(' ');
                self.write_rows(&values.rows)
            }
            QueryBody::Paren(inner) => {
                self.buf.push('(');
                self.write_query(inner)?;
                self.buf.push(')');
                Ok(())
            }
        }
    }

    fn write_rows(&mut self, rows: &[Vec<Expr>]) -> Result<(), FormatError> {
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.buf.push('(');
            for (j, expr) in row.iter().enumerate() {
                if j > 0 {
                    self.buf.push_str(", ");
                }
                self.write_expr(expr)?;
            }
            self.buf.push(')');
        }
        Ok(())
    }

    fn write_simple_select(&mut self, select: &SimpleSelect) -> Result<(), FormatError> {
        self.kw("SELECT");
        match &select.distinct {
            Distinct::All => {}
            Distinct::Distinct => {
                self.buf.push(' ');
                self.kw("DISTINCT");
            }
            Distinct::On(exprs) => {
                self.buf.push(' ');
                self.kw("DISTINCT ON");
                self.buf.push_str(" (");
                self.write_expr_list(exprs)?;
                self.buf.push(')');
            }
        }
        self.buf.push(' ');
        if select.projection.is_empty() {
            return Err(FormatError::new("SimpleSelect", "projection is empty"));
        }
        for (i, item) in select.projection.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_select_item(item)?;
        }

        if !select.from.is_empty() {
            self.clause_break();
            self.kw("FROM");
            self.buf.push(' ');
            for (i, table) in select.from.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.write_table_ref(table)?;
            }
        }

        if let Some(where_clause) = &select.where_clause {
            self.clause_break();
            self.kw("WHERE");
            self.buf.push(' ');
            self.write_expr(where_clause)?;
        }

        self.write_group_by(&select.group_by)?;

        if let Some(having) = &select.having {
            self.clause_break();
            self.kw("HAVING");
            self.buf.push(' ');
            self.write_expr(having)?;
        }

        if !select.windows.is_empty() {
            self.clause_break();
            self.kw("WINDOW");
            self.buf.push(' ');
            for (i, named) in select.windows.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.buf.push_str(&named.name);
                self.buf.push(' ');
                self.kw("AS");
                self.buf.push_str(" (");
                self.write_window_spec_body(&named.spec)?;
                self.buf.push(')');
            }
        }

        if let Some(locking) = select.locking {
            self.clause_break();
            self.kw("FOR");
            self.buf.push(' ');
            match locking {
                LockStrength::Update => self.kw("UPDATE"),
                LockStrength::Share => self.kw("SHARE"),
            }
        }

        Ok(())
    }

    fn write_group_by(&mut self, group_by: &GroupByClause) -> Result<(), FormatError> {
        match group_by {
            GroupByClause::None => Ok(()),
            GroupByClause::Exprs(exprs) => {
                self.clause_break();
                self.kw("GROUP BY");
                self.buf.push(' ');
                self.write_expr_list(exprs)
            }
            GroupByClause::GroupingSets(sets) => {
                self.clause_break();
                self.kw("GROUP BY");
                self.buf.push(' ');
                self.kw("GROUPING SETS");
                self.buf.push_str(" (");
                for (i, set) in sets.iter().enumerate() {
                    if i > 0 {
                        self.buf.push_str(", ");
                    }
                    self.buf.push('(');
                    self.write_expr_list(set)?;
                    self.buf.push(')');
                }
                self.buf.push(')');
                Ok(())
            }
            GroupByClause::Rollup(exprs) => {
                self.clause_break();
                self.kw("GROUP BY");
                self.buf.push(' ');
                self.kw("ROLLUP");
                self.buf.push_str(" (");
                self.write_expr_list(exprs)?;
                self.buf.push(')');
                Ok(())
            }
            GroupByClause::Cube(exprs) => {
                self.clause_break();
                self.kw("GROUP BY");
                self.buf.push(' ');
                self.kw("CUBE");
                self.buf.push_str(" (");
                self.write_expr_list(exprs)?;
                self.buf.push(')');
                Ok(())
            }
        }
    }

    fn write_select_item(&mut self, item: &SelectItem) -> Result<(), FormatError> {
        match item {
            SelectItem::Wildcard { table } => {
                if let Some(table) = table {
                    self.write_ident(table);
                    self.buf.push('.');
                }
                self.buf.push('*');
                Ok(())
            }
            SelectItem::Expr { expr, alias } => {
                self.write_expr(expr)?;
                if let Some(alias) = alias {
                    self.buf.push(' ');
                    self.kw("AS");
                    self.buf.push(' ');
                    self.write_ident(alias);
                }
                Ok(())
            }
        }
    }

    fn write_table_ref(&mut self, table: &TableRef) -> Result<(), FormatError> {
        match table {
            TableRef::Table { schema, name, alias } => {
                if let Some(schema) = schema {
                    self.write_ident(schema);
                    self.buf.push('.');
                }
                self.write_ident(name);
                if let Some(alias) = alias {
                    self.buf.push(' ');
                    self.kw("AS");
                    self.buf.push(' ');
                    self.write_ident(alias);
                }
                Ok(())
            }
            TableRef::Subquery { query, alias, lateral } => {
                if *lateral {
                    self.kw("LATERAL");
                    self.buf.push(' ');
                }
                self.buf.push('(');
                self.write_query(query)?;
                self.buf.push(')');
                self.buf.push(' ');
                self.kw("AS");
                self.buf.push(' ');
                self.write_ident(alias);
                Ok(())
            }
            TableRef::ValuesTable { rows, alias, columns } => {
                self.buf.push('(');
                self.kw("VALUES");
                self.buf.push(' ');
                self.write_rows(rows)?;
                self.buf.push(')');
                self.buf.push(' ');
                self.kw("AS");
                self.buf.push(' ');
                self.write_ident(alias);
                if !columns.is_empty() {
                    self.buf.push_str(" (");
                    for (i, col) in columns.iter().enumerate() {
                        if i > 0 {
                            self.buf.push_str(", ");
                        }
                        self.write_ident(col);
                    }
                    self.buf.push(')');
                }
                Ok(())
            }
            TableRef::Join { left, join } => {
                self.write_table_ref(left)?;
                self.buf.push(' ');
                self.write_join(join)
            }
        }
    }

    fn write_join(&mut self, join: &JoinClause) -> Result<(), FormatError> {
        if join.natural {
            self.kw("NATURAL");
            self.buf.push(' ');
        }
        self.kw(join.join_type.as_str());
        self.buf.push(' ');
        self.write_table_ref(&join.table)?;
        if let Some(on) = &join.on {
            self.buf.push(' ');
            self.kw("ON");
            self.buf.push(' ');
            self.write_expr(on)?;
        } else if !join.using.is_empty() && join.join_type != JoinType::Cross {
            self.buf.push(' ');
            self.kw("USING");
            self.buf.push_str(" (");
            for (i, col) in join.using.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.write_ident(col);
            }
            self.buf.push(')');
        }
        Ok(())
    }

    fn write_fetch(&mut self, fetch: &FetchClause) -> Result<(), FormatError> {
        self.kw("FETCH FIRST");
        self.buf.push(' ');
        self.write_expr(&fetch.count)?;
        self.buf.push(' ');
        self.kw("ROWS");
        self.buf.push(' ');
        if fetch.with_ties {
            self.kw("WITH TIES");
        } else {
            self.kw("ONLY");
        }
        Ok(())
    }

    fn write_order_by_list(&mut self, items: &[OrderByExpr]) -> Result<(), FormatError> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_expr(&item.expr)?;
            if item.direction == OrderDirection::Desc {
                self.buf.push(' ');
                self.kw("DESC");
            }
            if let Some(nulls) = item.nulls {
                self.buf.push(' ');
                self.kw("NULLS");
                self.buf.push(' ');
                match nulls {
                    NullOrdering::First => self.kw("FIRST"),
                    NullOrdering::Last => self.kw("LAST"),
                }
            }
        }
        Ok(())
    }

    fn write_expr_list(&mut self, exprs: &[Expr]) -> Result<(), FormatError> {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_expr(expr)?;
        }
        Ok(())
    }

    fn write_window_spec_body(&mut self, spec: &WindowSpec) -> Result<(), FormatError> {
        let mut wrote = false;
        if let Some(base) = &spec.base_window {
            self.buf.push_str(base);
            wrote = true;
        }
        if !spec.partition_by.is_empty() {
            if wrote {
                self.buf.push(' ');
            }
            self.kw("PARTITION BY");
            self.buf.push(' ');
            self.write_expr_list(&spec.partition_by)?;
            wrote = true;
        }
        if !spec.order_by.is_empty() {
            if wrote {
                self.buf.push(' ');
            }
            self.kw("ORDER BY");
            self.buf.push(' ');
            self.write_order_by_list(&spec.order_by)?;
            wrote = true;
        }
        if let Some(frame) = &spec.frame {
            if wrote {
                self.buf.push(' ');
            }
            self.write_window_frame(frame)?;
        }
        Ok(())
    }

    fn write_window_frame(&mut self, frame: &WindowFrame) -> Result<(), FormatError> {
        self.kw(match frame.unit {
            WindowFrameUnit::Rows => "ROWS",
            WindowFrameUnit::Range => "RANGE",
            WindowFrameUnit::Groups => "GROUPS",
        });
        self.buf.push(' ');
        if let Some(end) = &frame.end {
            self.kw("BETWEEN");
            self.buf.push(' ');
            self.write_frame_bound(&frame.start)?;
            self.buf.push(' ');
            self.kw("AND");
            self.buf.push(' ');
            self.write_frame_bound(end)
        } else {
            self.write_frame_bound(&frame.start)
        }
    }

    fn write_frame_bound(&mut self, bound: &WindowFrameBound) -> Result<(), FormatError> {
        match bound {
            WindowFrameBound::UnboundedPreceding => {
                self.kw("UNBOUNDED PRECEDING");
                Ok(())
            }
            WindowFrameBound::UnboundedFollowing => {
                self.kw("UNBOUNDED FOLLOWING");
                Ok(())
            }
            WindowFrameBound::CurrentRow => {
                self.kw("CURRENT ROW");
                Ok(())
            }
            WindowFrameBound::Preceding(expr) => {
                self.write_expr(expr)?;
                self.buf.push(' ');
                self.kw("PRECEDING");
                Ok(())
            }
            WindowFrameBound::Following(expr) => {
                self.write_expr(expr)?;
                self.buf.push(' ');
                self.kw("FOLLOWING");
                Ok(())
            }
        }
    }

    fn write_expr(&mut self, expr: &Expr) -> Result<(), FormatError> {
        match &expr.kind {
            ExprKind::Literal(lit) => self.write_literal(lit),
            ExprKind::Parameter(param) => {
                self.write_placeholder(param);
                Ok(())
            }
            ExprKind::Column { table, name } => {
                if let Some(table) = table {
                    self.write_ident(table);
                    self.buf.push('.');
                }
                self.write_ident(name);
                Ok(())
            }
            ExprKind::Wildcard { table } => {
                if let Some(table) = table {
                    self.write_ident(table);
                    self.buf.push('.');
                }
                self.buf.push('*');
                Ok(())
            }
            ExprKind::Binary { left, op, right } => {
                self.write_expr(left)?;
                self.buf.push(' ');
                self.write_binary_op(*op);
                self.buf.push(' ');
                self.write_expr(right)
            }
            ExprKind::Unary { op, operand } => {
                match op {
                    UnaryOp::Not => {
                        self.kw("NOT");
                        self.buf.push(' ');
                    }
                    other => self.buf.push_str(other.as_str()),
                }
                self.write_expr(operand)
            }
            ExprKind::Function(call) => self.write_function_call(call),
            ExprKind::Subquery(query) => {
                self.buf.push('(');
                self.write_query(query)?;
                self.buf.push(')');
                Ok(())
            }
            ExprKind::Exists { subquery, negated } => {
                if *negated {
                    self.kw("NOT");
                    self.buf.push(' ');
                }
                self.kw("EXISTS");
                self.buf.push_str(" (");
                self.write_query(subquery)?;
                self.buf.push(')');
                Ok(())
            }
            ExprKind::IsNull { expr, negated } => {
                self.write_expr(expr)?;
                self.buf.push(' ');
                self.kw("IS");
                self.buf.push(' ');
                if *negated {
                    self.kw("NOT");
                    self.buf.push(' ');
                }
                self.kw("NULL");
                Ok(())
            }
            ExprKind::In { expr, list, negated } => {
                self.write_expr(expr)?;
                self.buf.push(' ');
                if *negated {
                    self.kw("NOT");
                    self.buf.push(' ');
                }
                self.kw("IN");
                self.buf.push_str(" (");
                match list {
                    InList::Exprs(exprs) => {
                        if exprs.is_empty() {
                            return Err(FormatError::new("In", "list has no elements"));
                        }
                        self.write_expr_list(exprs)?;
                    }
                    InList::Subquery(query) => self.write_query(query)?,
                }
                self.buf.push(')');
                Ok(())
            }
            ExprKind::Between { expr, low, high, negated } => {
                self.write_expr(expr)?;
                self.buf.push(' ');
                if *negated {
                    self.kw("NOT");
                    self.buf.push(' ');
                }
                self.kw("BETWEEN");
                self.buf.push(' ');
                self.write_expr(low)?;
                self.buf.push(' ');
                self.kw("AND");
                self.buf.push(' ');
                self.write_expr(high)
            }
            ExprKind::Case { operand, when_clauses, else_clause } => {
                self.kw("CASE");
                if let Some(operand) = operand {
                    self.buf.push(' ');
                    self.write_expr(operand)?;
                }
                if when_clauses.is_empty() {
                    return Err(FormatError::new("Case", "no WHEN clauses"));
                }
                for (when, then) in when_clauses {
                    self.buf.push(' ');
                    self.kw("WHEN");
                    self.buf.push(' ');
                    self.write_expr(when)?;
                    self.buf.push(' ');
                    self.kw("THEN");
                    self.buf.push(' ');
                    self.write_expr(then)?;
                }
                if let Some(else_clause) = else_clause {
                    self.buf.push(' ');
                    self.kw("ELSE");
                    self.buf.push(' ');
                    self.write_expr(else_clause)?;
                }
                self.buf.push(' ');
                self.kw("END");
                Ok(())
            }
            ExprKind::Cast { expr, data_type } => {
                self.kw("CAST");
                self.buf.push_str(" (");
                self.write_expr(expr)?;
                self.buf.push(' ');
                self.kw("AS");
                self.buf.push(' ');
                self.buf.push_str(&data_type.to_sql());
                self.buf.push(')');
                Ok(())
            }
            ExprKind::Paren(inner) => {
                self.buf.push('(');
                self.write_expr(inner)?;
                self.buf.push(')');
                Ok(())
            }
            ExprKind::Array(exprs) => {
                self.kw("ARRAY");
                self.buf.push('[');
                self.write_expr_list(exprs)?;
                self.buf.push(']');
                Ok(())
            }
            ExprKind::Row(exprs) => {
                self.kw("ROW");
                self.buf.push('(');
                self.write_expr_list(exprs)?;
                self.buf.push(')');
                Ok(())
            }
        }
    }

    fn write_binary_op(&mut self, op: BinaryOp) {
        let text = op.as_str();
        if text.chars().next().is_some_and(char::is_alphabetic) {
            self.kw(text);
        } else {
            self.buf.push_str(text);
        }
    }

    fn write_function_call(&mut self, call: &FunctionCall) -> Result<(), FormatError> {
        self.buf.push_str(&call.name);
        self.buf.push('(');
        if call.distinct {
            self.kw("DISTINCT");
            self.buf.push(' ');
        }
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            match arg {
                FunctionArg::Wildcard => self.buf.push('*'),
                FunctionArg::Expr(expr) => self.write_expr(expr)?,
            }
        }
        if !call.order_by.is_empty() {
            self.buf.push(' ');
            self.kw("ORDER BY");
            self.buf.push(' ');
            self.write_order_by_list(&call.order_by)?;
        }
        self.buf.push(')');

        if !call.within_group.is_empty() {
            self.buf.push(' ');
            self.kw("WITHIN GROUP");
            self.buf.push_str(" (");
            self.kw("ORDER BY");
            self.buf.push(' ');
            self.write_order_by_list(&call.within_group)?;
            self.buf.push(')');
        }
        if let Some(filter) = &call.filter {
            self.buf.push(' ');
            self.kw("FILTER");
            self.buf.push_str(" (");
            self.kw("WHERE");
            self.buf.push(' ');
            self.write_expr(filter)?;
            self.buf.push(')');
        }
        if let Some(over) = &call.over {
            self.buf.push(' ');
            self.kw("OVER");
            self.buf.push(' ');
            match over {
                WindowRef::Named(name) => self.buf.push_str(name),
                WindowRef::Inline(spec) => {
                    self.buf.push('(');
                    self.write_window_spec_body(spec)?;
                    self.buf.push(')');
                }
            }
        }
        Ok(())
    }

    fn write_literal(&mut self, literal: &Literal) -> Result<(), FormatError> {
        match literal {
            Literal::Integer(value) => {
                write!(self.buf, "{value}").expect("String writes never fail");
            }
            Literal::Float(value) => {
                write!(self.buf, "{value}").expect("String writes never fail");
            }
            Literal::String(value) => {
                self.buf.push('\'');
                for ch in value.chars() {
                    if ch == '\'' {
                        self.buf.push('\'');
                    }
                    self.buf.push(ch);
                }
                self.buf.push('\'');
            }
            Literal::DollarString { tag, value } => {
                write!(self.buf, "${tag}${value}${tag}$").expect("String writes never fail");
            }
            Literal::Boolean(value) => self.kw(if *value { "TRUE" } else { "FALSE" }),
            Literal::Null => self.kw("NULL"),
        }
        Ok(())
    }

    /// Records `param`'s slot (assigning it the next first-occurrence index
    /// if unseen) and writes the placeholder text for the configured output
    /// style.
    fn write_placeholder(&mut self, param: &ParamRef) {
        let key = match param {
            ParamRef::Named(name) | ParamRef::At(name) => SlotKey::Name(name.clone()),
            ParamRef::Positional(n) => SlotKey::Position(*n),
            ParamRef::Anonymous => {
                let id = self.anon_counter;
                self.anon_counter += 1;
                SlotKey::Anon(id)
            }
        };

        let index = self
            .slot_order
            .iter()
            .position(|existing| existing == &key)
            .unwrap_or_else(|| {
                self.slot_order.push(key.clone());
                self.slot_order.len() - 1
            });

        match self.options.placeholder_style() {
            PlaceholderStyle::Named => {
                self.buf.push(':');
                self.buf.push_str(&slot_display_name(&self.slot_order[index], index));
            }
            PlaceholderStyle::AtNamed => {
                self.buf.push('@');
                self.buf.push_str(&slot_display_name(&self.slot_order[index], index));
            }
            PlaceholderStyle::Numbered => {
                write!(self.buf, "${}", index + 1).expect("String writes never fail");
            }
            PlaceholderStyle::Anonymous => {
                self.buf.push('?');
            }
        }
    }

    /// Builds the `params` payload matching the configured placeholder
    /// style, resolving named slots against `bindings`. Slots with no
    /// matching binding (positional/anonymous source placeholders, or a
    /// name absent from `bindings`) resolve to [`ParamValue::Null`].
    fn build_payload(&self, bindings: &ParamBindings) -> ParamsPayload {
        let resolve = |key: &SlotKey| match key {
            SlotKey::Name(name) => bindings.get(name).cloned().unwrap_or(ParamValue::Null),
            SlotKey::Position(_) | SlotKey::Anon(_) => ParamValue::Null,
        };

        match self.options.placeholder_style() {
            PlaceholderStyle::Named | PlaceholderStyle::AtNamed => ParamsPayload::Named(
                self.slot_order
                    .iter()
                    .enumerate()
                    .map(|(i, key)| (slot_display_name(key, i), resolve(key)))
                    .collect(),
            ),
            PlaceholderStyle::Numbered | PlaceholderStyle::Anonymous => {
                ParamsPayload::Positional(self.slot_order.iter().map(resolve).collect())
            }
        }
    }
}

fn slot_display_name(key: &SlotKey, index: usize) -> String {
    match key {
        SlotKey::Name(name) => name.clone(),
        SlotKey::Position(_) | SlotKey::Anon(_) => format!("p{}", index + 1),
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::options::Preset;
    use crate::parser::Parser;

    fn render(sql: &str, options: &FormatOptions, bindings: &ParamBindings) -> FormattedQuery {
        let ast = Parser::parse(sql, &crate::dialect::PostgresDialect).unwrap();
        SqlFormatter::format(&ast, options, bindings).unwrap()
    }

    #[test]
    fn round_trips_plain_select() {
        let options = FormatOptions::new(Preset::Postgres);
        let out = render("select id, name from users where active = true", &options, &ParamBindings::new());
        assert_eq!(out.sql, "SELECT id, name FROM users WHERE active = TRUE");
    }

    #[test]
    fn lowercase_keyword_case() {
        let options = FormatOptions::new(Preset::Postgres).with_keyword_case(KeywordCase::Lower);
        let out = render("SELECT id FROM users", &options, &ParamBindings::new());
        assert_eq!(out.sql, "select id from users");
    }

    #[test]
    fn named_placeholder_resolves_bound_value() {
        let options = FormatOptions::new(Preset::Postgres).with_placeholder_style(PlaceholderStyle::Named);
        let mut bindings = ParamBindings::new();
        bindings.insert("id", ParamValue::Integer(42));
        let out = render("SELECT id FROM users WHERE id = :id", &options, &bindings);
        assert_eq!(out.sql, "SELECT id FROM users WHERE id = :id");
        assert_eq!(
            out.params,
            ParamsPayload::Named(vec![("id".to_string(), ParamValue::Integer(42))])
        );
    }

    #[test]
    fn numbered_placeholder_reuses_index_for_repeated_name() {
        let options = FormatOptions::new(Preset::Postgres).with_placeholder_style(PlaceholderStyle::Numbered);
        let out = render(
            "SELECT id FROM users WHERE id = :id OR parent_id = :id",
            &options,
            &ParamBindings::new(),
        );
        assert_eq!(
            out.sql,
            "SELECT id FROM users WHERE id = $1 OR parent_id = $1"
        );
    }

    #[test]
    fn anonymous_placeholders_never_reuse_an_index() {
        let options = FormatOptions::new(Preset::Postgres).with_placeholder_style(PlaceholderStyle::Anonymous);
        let out = render("SELECT id FROM users WHERE id = ? OR id = ?", &options, &ParamBindings::new());
        assert_eq!(out.sql, "SELECT id FROM users WHERE id = ? OR id = ?");
        assert_eq!(
            out.params,
            ParamsPayload::Positional(vec![ParamValue::Null, ParamValue::Null])
        );
    }

    #[test]
    fn when_needed_quoting_escapes_keyword_collision() {
        let options = FormatOptions::new(Preset::Postgres);
        let mut ast = crate::ast::QueryAst::simple(crate::ast::SimpleSelect::empty());
        if let QueryBody::Select(select) = &mut ast.body {
            select.projection.push(SelectItem::Expr {
                expr: Expr::column(Ident::unquoted("order")),
                alias: None,
            });
            select.from.push(TableRef::table("t"));
        }
        let out = SqlFormatter::format(&ast, &options, &ParamBindings::new()).unwrap();
        assert_eq!(out.sql, "SELECT \"order\" FROM t");
    }

    #[test]
    fn always_quoting_wraps_every_identifier() {
        let options = FormatOptions::new(Preset::Postgres).with_identifier_quoting(IdentifierQuoting::Always);
        let out = render("SELECT id FROM users", &options, &ParamBindings::new());
        assert_eq!(out.sql, "SELECT \"id\" FROM \"users\"");
    }

    #[test]
    fn fails_on_empty_in_list() {
        let options = FormatOptions::new(Preset::Postgres);
        let mut select = SimpleSelect::empty();
        select.projection.push(SelectItem::Expr { expr: Expr::column("id"), alias: None });
        select.from.push(TableRef::table("t"));
        select.where_clause = Some(Expr::without_span(ExprKind::In {
            expr: Box::new(Expr::column("id")),
            list: InList::Exprs(Vec::new()),
            negated: false,
        }));
        let ast = QueryAst::simple(select);
        let err = SqlFormatter::format(&ast, &options, &ParamBindings::new()).unwrap_err();
        assert_eq!(err.node, "In");
    }

    #[test]
    fn preserves_dollar_quoted_string_content() {
        let options = FormatOptions::new(Preset::Postgres);
        let out = render("SELECT $tag$it's fine$tag$", &options, &ParamBindings::new());
        assert_eq!(out.sql, "SELECT $tag$it's fine$tag$");
    }
}
