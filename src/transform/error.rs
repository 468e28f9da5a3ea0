//! Transformer error types.

use core::fmt;

/// Raised by [`super::param_inject::inject`] when a requested parameter name
/// cannot be resolved to a column in the query's scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectError {
    pub name: String,
}

impl fmt::Display for InjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no column in scope matches injection parameter `{}`",
            self.name
        )
    }
}

impl std::error::Error for InjectError {}

/// Raised by [`super::fixture_rewrite::rewrite_query`] when a table has no
/// registered fixture and the policy is [`super::fixture_rewrite::MissingFixturePolicy::Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFixtureError {
    pub table: String,
}

impl fmt::Display for MissingFixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no fixture registered for table `{}`", self.table)
    }
}

impl std::error::Error for MissingFixtureError {}
