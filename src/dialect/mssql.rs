//! MSSQL-leaning dialect preset.

use super::{Dialect, IdentifierQuoting, KeywordCase, PlaceholderStyle};

/// MSSQL-leaning: `[identifier]` brackets, `@name` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsSqlDialect;

impl Dialect for MsSqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn identifier_quote_pairs(&self) -> &'static [(char, char)] {
        &[('[', ']'), ('"', '"')]
    }

    fn accepts_at_parameters(&self) -> bool {
        true
    }

    fn accepts_question_parameters(&self) -> bool {
        false
    }

    fn default_placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::AtNamed
    }

    fn default_identifier_quoting(&self) -> IdentifierQuoting {
        IdentifierQuoting::WhenNeeded
    }

    fn default_keyword_case(&self) -> KeywordCase {
        KeywordCase::Upper
    }
}
