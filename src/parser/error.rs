//! Parser error types.

use core::fmt;

use crate::lexer::{LexError, Span, TokenKind};

/// A parse error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        let expected_str: String = expected.into();
        Self {
            message: format!("unexpected token: expected {expected_str}, found {found:?}"),
            span,
            expected: Some(expected_str),
            found: Some(found),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected_str: String = expected.into();
        Self {
            message: format!("unexpected end of input: expected {expected_str}"),
            span,
            expected: Some(expected_str),
            found: Some(TokenKind::Eof),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at position {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            message: err.message,
            span: err.span,
            expected: None,
            found: None,
        }
    }
}

/// Raised by [`super::Parser::parse_async`] when a [`crate::parser::CancellationToken`]
/// is observed set at a yield point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("parse cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Either a parse failure or a cooperative cancellation, returned by the
/// async parsing entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncParseError {
    Parse(ParseError),
    Cancelled(Cancelled),
}

impl fmt::Display for AsyncParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => e.fmt(f),
            Self::Cancelled(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for AsyncParseError {}

impl From<ParseError> for AsyncParseError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<Cancelled> for AsyncParseError {
    fn from(err: Cancelled) -> Self {
        Self::Cancelled(err)
    }
}
