//! SQLite-leaning dialect preset.

use super::{Dialect, IdentifierQuoting, KeywordCase, PlaceholderStyle};

/// SQLite-leaning: double-quote-as-identifier, `?n` / `?` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn identifier_quote_pairs(&self) -> &'static [(char, char)] {
        &[('"', '"'), ('`', '`'), ('[', ']')]
    }

    fn accepts_dollar_parameters(&self) -> bool {
        true
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
