//! MySQL-leaning dialect preset.

use super::{Dialect, IdentifierQuoting, KeywordCase, PlaceholderStyle};

/// MySQL-leaning: backtick identifiers, `?` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote_pairs(&self) -> &'static [(char, char)] {
        &[('`', '`')]
    }

    fn accepts_at_parameters(&self) -> bool {
        true
    }

    fn default_placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Anonymous
    }

    fn default_identifier_quoting(&self) -> IdentifierQuoting {
        IdentifierQuoting::WhenNeeded
    }

    fn default_keyword_case(&self) -> KeywordCase {
        KeywordCase::Upper
    }
}
