//! Formatter error type.

use core::fmt;

/// Raised when the formatter encounters an AST node that violates an
/// invariant it relies on (e.g. an empty `IN` list). Well-formed ASTs
/// produced by [`crate::parser::Parser`] or the [`crate::transform`]
/// functions never trigger this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    pub node: String,
    pub reason: String,
}

impl FormatError {
    #[must_use]
    pub fn new(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot format {}: {}", self.node, self.reason)
    }
}

impl std::error::Error for FormatError {}
