//! PostgreSQL dialect preset.

use super::{Dialect, IdentifierQuoting, KeywordCase, PlaceholderStyle};

/// PostgreSQL: dollar-quoting, `::` cast, `$n` placeholders, array/row
/// constructors, LATERAL, window functions, `DISTINCT ON`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn accepts_dollar_quoted_strings(&self) -> bool {
        true
    }

    fn accepts_dollar_parameters(&self) -> bool {
        true
    }

    fn accepts_at_parameters(&self) -> bool {
        false
    }

    fn default_placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Numbered
    }

    fn default_identifier_quoting(&self) -> IdentifierQuoting {
        IdentifierQuoting::WhenNeeded
    }

    fn default_keyword_case(&self) -> KeywordCase {
        KeywordCase::Upper
    }
}
