//! SQL tokenizer implementation.

use crate::dialect::Dialect;

use super::{error::LexError, Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes SQL input for a given dialect.
pub struct Lexer<'a> {
    input: &'a str,
    dialect: &'a dyn Dialect,
    pos: usize,
    start: usize,
    /// When true, comments and whitespace are emitted as tokens instead of
    /// being skipped, for diagnostics that need trivia spans.
    keep_trivia: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for `input` under `dialect`.
    #[must_use]
    pub fn new(input: &'a str, dialect: &'a dyn Dialect) -> Self {
        Self {
            input,
            dialect,
            pos: 0,
            start: 0,
            keep_trivia: false,
        }
    }

    /// Enables trivia (comment/whitespace) tokens in the output stream.
    #[must_use]
    pub const fn with_trivia(mut self) -> Self {
        self.keep_trivia = true;
        self
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn ok(&self, kind: TokenKind) -> Result<Token, LexError> {
        Ok(Token::new(kind, self.make_span()))
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                self.advance();
                self.advance();
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                let mut depth = 1usize;
                loop {
                    match (self.peek(), self.peek_next()) {
                        (Some('/'), Some('*')) => {
                            self.advance();
                            self.advance();
                            depth += 1;
                        }
                        (Some('*'), Some('/')) => {
                            self.advance();
                            self.advance();
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        (Some(_), _) => {
                            self.advance();
                        }
                        (None, _) => {
                            return Err(LexError::new(
                                "unterminated block comment",
                                self.make_span(),
                            ));
                        }
                    }
                }
                continue;
            }
            break;
        }
        Ok(())
    }

    fn scan_identifier(&mut self) -> Result<Token, LexError> {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];

        // `E'...'` C-escape string form (PostgreSQL).
        if (text == "E" || text == "e") && self.peek() == Some('\'') {
            return self.scan_string('\'', true);
        }

        if let Some(keyword) = Keyword::from_str(text) {
            self.ok(TokenKind::Keyword(keyword))
        } else {
            self.ok(TokenKind::Identifier(text.to_string()))
        }
    }

    fn scan_quoted_identifier(&mut self, open: char, close: char) -> Result<Token, LexError> {
        self.advance(); // opening delimiter
        let content_start = self.pos;
        loop {
            match self.peek() {
                Some(c) if c == close => {
                    if self.peek_next() == Some(close) {
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    return Err(LexError::new(
                        "unterminated quoted identifier",
                        self.make_span(),
                    ));
                }
            }
        }
        let content = &self.input[content_start..self.pos];
        let unescaped = if open == close {
            content.replace(&format!("{close}{close}"), &close.to_string())
        } else {
            content.to_string()
        };
        self.advance(); // closing delimiter
        self.ok(TokenKind::QuotedIdentifier(unescaped))
    }

    fn scan_number(&mut self) -> Result<Token, LexError> {
        let mut is_float = false;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.input[self.start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(|f| Token::new(TokenKind::Float(f), self.make_span()))
                .map_err(|e| LexError::new(format!("invalid float: {e}"), self.make_span()))
        } else {
            text.parse::<i64>()
                .map(|i| Token::new(TokenKind::Integer(i), self.make_span()))
                .map_err(|e| LexError::new(format!("invalid integer: {e}"), self.make_span()))
        }
    }

    /// Scans a `'...'` string starting at the current position (the opening
    /// quote, whether or not an `E`/`e` prefix preceded it). `c_escapes`
    /// enables backslash escapes for the `E'...'` form.
    fn scan_string(&mut self, quote: char, c_escapes: bool) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        value.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some('\\') if c_escapes => {
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some(c) if c == quote => value.push(quote),
                        Some(other) => value.push(other),
                        None => {
                            return Err(LexError::new(
                                "unterminated string literal",
                                self.make_span(),
                            ));
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return Err(LexError::new(
                        "unterminated string literal",
                        self.make_span(),
                    ));
                }
            }
        }
        self.advance(); // closing quote
        self.ok(TokenKind::String(value))
    }

    /// Scans `$tag$...$tag$` once a dollar-quote opener is confirmed.
    fn scan_dollar_string(&mut self) -> Result<Token, LexError> {
        self.advance(); // opening $
        let tag_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let tag = self.input[tag_start..self.pos].to_string();
        if self.peek() != Some('$') {
            return Err(LexError::new("malformed dollar-quote tag", self.make_span()));
        }
        self.advance(); // closing $ of opener
        let closer = format!("${tag}$");
        let content_start = self.pos;
        loop {
            if self.input[self.pos..].starts_with(closer.as_str()) {
                break;
            }
            if self.advance().is_none() {
                return Err(LexError::new(
                    "unterminated dollar-quoted string",
                    self.make_span(),
                ));
            }
        }
        let value = self.input[content_start..self.pos].to_string();
        self.pos += closer.len();
        self.ok(TokenKind::DollarString { tag, value })
    }

    /// Looks ahead from `$` to distinguish a `$n` positional parameter
    /// (digits only) from a dollar-quote opener (anything else, including an
    /// immediate second `$` for an empty tag).
    fn dollar_starts_positional(&self) -> bool {
        matches!(self.peek_next(), Some(c) if c.is_ascii_digit())
    }

    fn scan_dollar_positional(&mut self) -> Result<Token, LexError> {
        self.advance(); // $
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let n: u32 = self.input[digits_start..self.pos]
            .parse()
            .map_err(|_| LexError::new("invalid positional parameter", self.make_span()))?;
        self.ok(TokenKind::PositionalParameter(n))
    }

    fn scan_colon_or_named(&mut self) -> Result<Token, LexError> {
        self.advance(); // :
        if self.peek() == Some(':') {
            self.advance();
            return self.ok(TokenKind::DoubleColon);
        }
        if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            let name_start = self.pos;
            while self
                .peek()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
            {
                self.advance();
            }
            return self.ok(TokenKind::NamedParameter(
                self.input[name_start..self.pos].to_string(),
            ));
        }
        self.ok(TokenKind::Colon)
    }

    fn scan_at_or_named(&mut self) -> Result<Token, LexError> {
        self.advance(); // @
        if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            let name_start = self.pos;
            while self
                .peek()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
            {
                self.advance();
            }
            return self.ok(TokenKind::AtParameter(
                self.input[name_start..self.pos].to_string(),
            ));
        }
        self.ok(TokenKind::Error("bare '@' is not a valid token".into()))
    }

    fn quote_pair_for(&self, c: char) -> Option<(char, char)> {
        self.dialect
            .identifier_quote_pairs()
            .iter()
            .copied()
            .find(|(open, _)| *open == c)
    }

    fn next_raw(&mut self) -> Result<Token, LexError> {
        self.start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return self.ok(TokenKind::Eof),
        };

        if let Some((open, close)) = self.quote_pair_for(c) {
            return self.scan_quoted_identifier(open, close);
        }

        match c {
            '(' => {
                self.advance();
                self.ok(TokenKind::LeftParen)
            }
            ')' => {
                self.advance();
                self.ok(TokenKind::RightParen)
            }
            '[' => {
                self.advance();
                self.ok(TokenKind::LeftBracket)
            }
            ']' => {
                self.advance();
                self.ok(TokenKind::RightBracket)
            }
            ',' => {
                self.advance();
                self.ok(TokenKind::Comma)
            }
            ';' => {
                self.advance();
                self.ok(TokenKind::Semicolon)
            }
            '+' => {
                self.advance();
                self.ok(TokenKind::Plus)
            }
            '-' => {
                self.advance();
                match self.peek() {
                    Some('>') => {
                        self.advance();
                        if self.peek() == Some('>') {
                            self.advance();
                            self.ok(TokenKind::LongArrow)
                        } else {
                            self.ok(TokenKind::Arrow)
                        }
                    }
                    _ => self.ok(TokenKind::Minus),
                }
            }
            '*' => {
                self.advance();
                self.ok(TokenKind::Star)
            }
            '/' => {
                self.advance();
                self.ok(TokenKind::Slash)
            }
            '%' => {
                self.advance();
                self.ok(TokenKind::Percent)
            }
            '^' => {
                self.advance();
                self.ok(TokenKind::Caret)
            }
            '~' => {
                self.advance();
                self.ok(TokenKind::BitNot)
            }
            '?' => {
                self.advance();
                self.ok(TokenKind::AnonymousParameter)
            }
            '.' => {
                self.advance();
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos = self.start;
                    self.scan_number()
                } else {
                    self.ok(TokenKind::Dot)
                }
            }
            ':' => self.scan_colon_or_named(),
            '@' => self.scan_at_or_named(),
            '=' => {
                self.advance();
                self.ok(TokenKind::Eq)
            }
            '<' => {
                self.advance();
                match self.peek() {
                    Some('=') => {
                        self.advance();
                        self.ok(TokenKind::LtEq)
                    }
                    Some('>') => {
                        self.advance();
                        self.ok(TokenKind::NotEq)
                    }
                    Some('<') => {
                        self.advance();
                        self.ok(TokenKind::LeftShift)
                    }
                    _ => self.ok(TokenKind::Lt),
                }
            }
            '>' => {
                self.advance();
                match self.peek() {
                    Some('=') => {
                        self.advance();
                        self.ok(TokenKind::GtEq)
                    }
                    Some('>') => {
                        self.advance();
                        self.ok(TokenKind::RightShift)
                    }
                    _ => self.ok(TokenKind::Gt),
                }
            }
            '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    self.ok(TokenKind::NotEq)
                } else {
                    self.ok(TokenKind::Error("unexpected character: !".into()))
                }
            }
            '|' => {
                self.advance();
                if self.peek() == Some('|') {
                    self.advance();
                    self.ok(TokenKind::Concat)
                } else {
                    self.ok(TokenKind::BitOr)
                }
            }
            '&' => {
                self.advance();
                self.ok(TokenKind::BitAnd)
            }
            '#' => {
                self.advance();
                match self.peek() {
                    Some('>') => {
                        self.advance();
                        if self.peek() == Some('>') {
                            self.advance();
                            self.ok(TokenKind::HashLongArrow)
                        } else {
                            self.ok(TokenKind::HashArrow)
                        }
                    }
                    _ => self.ok(TokenKind::Error("unexpected character: #".into())),
                }
            }
            '\'' => self.scan_string('\'', false),
            '$' => {
                if self.dialect.accepts_dollar_parameters() && self.dollar_starts_positional() {
                    self.scan_dollar_positional()
                } else if self.dialect.accepts_dollar_quoted_strings() {
                    self.scan_dollar_string()
                } else {
                    self.advance();
                    self.ok(TokenKind::Error("unsupported '$' in this dialect".into()))
                }
            }
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),
            other => {
                self.advance();
                self.ok(TokenKind::Error(format!("unexpected character: {other}")))
            }
        }
    }

    /// Scans the next semantically meaningful token, skipping trivia unless
    /// [`Lexer::with_trivia`] was requested.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.keep_trivia {
            self.start = self.pos;
            if self.peek().is_some_and(char::is_whitespace) {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.advance();
                }
                return self.ok(TokenKind::Whitespace);
            }
            if (self.peek() == Some('-') && self.peek_next() == Some('-'))
                || (self.peek() == Some('/') && self.peek_next() == Some('*'))
            {
                let before = self.pos;
                self.skip_whitespace_and_comments()?;
                let text = self.input[before..self.pos].to_string();
                return Ok(Token::new(
                    TokenKind::Comment(text),
                    Span::new(before, self.pos),
                ));
            }
            self.next_raw()
        } else {
            self.skip_whitespace_and_comments()?;
            self.next_raw()
        }
    }

    /// Tokenizes the entire input, stopping at the first [`LexError`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            if let TokenKind::Error(message) = token.kind {
                return Err(LexError::new(message, token.span));
            }
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::PostgresDialect;

    const PG: PostgresDialect = PostgresDialect;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input, &PG).tokenize().unwrap()
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn line_comment_skipped() {
        assert_eq!(
            kinds("SELECT -- comment\nFROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn block_comment_nests() {
        assert_eq!(
            kinds("SELECT /* outer /* inner */ still outer */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn quoted_identifier_roundtrips_case_and_doubled_quote() {
        assert_eq!(
            kinds("\"My Column\" \"quo\"\"te\""),
            vec![
                TokenKind::QuotedIdentifier("My Column".into()),
                TokenKind::QuotedIdentifier("quo\"te".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn dollar_quoted_string() {
        assert_eq!(
            kinds("$tag$it''s fine$tag$"),
            vec![
                TokenKind::DollarString {
                    tag: "tag".into(),
                    value: "it''s fine".into(),
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn dollar_quote_empty_tag() {
        assert_eq!(
            kinds("$$hello$$"),
            vec![
                TokenKind::DollarString {
                    tag: String::new(),
                    value: "hello".into(),
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn dollar_positional_parameter() {
        assert_eq!(
            kinds("$1 $23"),
            vec![
                TokenKind::PositionalParameter(1),
                TokenKind::PositionalParameter(23),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn named_and_anonymous_parameters() {
        assert_eq!(
            kinds(":name ?"),
            vec![
                TokenKind::NamedParameter("name".into()),
                TokenKind::AnonymousParameter,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn e_string_c_escape() {
        assert_eq!(
            kinds("E'line1\\nline2'"),
            vec![TokenKind::String("line1\nline2".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn number_forms() {
        assert_eq!(
            kinds("42 3.14 .5 1e10 2.5e-3"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Float(3.14),
                TokenKind::Float(0.5),
                TokenKind::Float(1e10),
                TokenKind::Float(2.5e-3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn json_and_cast_operators() {
        assert_eq!(
            kinds("a -> b ->> c #> d #>> e ::int"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Arrow,
                TokenKind::Identifier("b".into()),
                TokenKind::LongArrow,
                TokenKind::Identifier("c".into()),
                TokenKind::HashArrow,
                TokenKind::Identifier("d".into()),
                TokenKind::HashLongArrow,
                TokenKind::Identifier("e".into()),
                TokenKind::DoubleColon,
                TokenKind::Keyword(Keyword::Int),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn dot_is_punctuation_between_identifiers() {
        assert_eq!(
            kinds("t.col"),
            vec![
                TokenKind::Identifier("t".into()),
                TokenKind::Dot,
                TokenKind::Identifier("col".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn span_tracking() {
        let tokens = tokenize("SELECT id");
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(tokens[1].span, Span::new(7, 9));
    }

    #[test]
    fn trivia_preserved_when_requested() {
        let mut lexer = Lexer::new("SELECT  1", &PG).with_trivia();
        let mut kinds = Vec::new();
        loop {
            let t = lexer.next_token().unwrap();
            let done = t.is_eof();
            kinds.push(t.kind);
            if done {
                break;
            }
        }
        assert!(kinds.contains(&TokenKind::Whitespace));
    }
}
