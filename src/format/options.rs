//! Formatting options: dialect preset plus overrides.

use crate::dialect::{
    Dialect, IdentifierQuoting, KeywordCase, MsSqlDialect, MySqlDialect, PlaceholderStyle,
    PostgresDialect, SqliteDialect,
};

/// Which dialect's defaults an unset option falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Postgres,
    MySql,
    Sqlite,
    MsSql,
}

struct PresetDefaults {
    placeholder_style: PlaceholderStyle,
    identifier_quoting: IdentifierQuoting,
    keyword_case: KeywordCase,
    quote_pairs: &'static [(char, char)],
}

impl Preset {
    fn defaults(self) -> PresetDefaults {
        fn defaults_of(d: &dyn Dialect) -> PresetDefaults {
            PresetDefaults {
                placeholder_style: d.default_placeholder_style(),
                identifier_quoting: d.default_identifier_quoting(),
                keyword_case: d.default_keyword_case(),
                quote_pairs: d.identifier_quote_pairs(),
            }
        }
        match self {
            Self::Postgres => defaults_of(&PostgresDialect),
            Self::MySql => defaults_of(&MySqlDialect),
            Self::Sqlite => defaults_of(&SqliteDialect),
            Self::MsSql => defaults_of(&MsSqlDialect),
        }
    }
}

/// Line-break style used between top-level clauses when `indent > 0`. Has no
/// effect at `indent == 0`, which always renders single-line output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
    #[default]
    Lf,
    CrLf,
}

/// Rendering options for [`super::SqlFormatter`]. Any field left `None`
/// falls back to `preset`'s default.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub preset: Preset,
    pub keyword_case: Option<KeywordCase>,
    pub placeholder_style: Option<PlaceholderStyle>,
    pub identifier_quoting: Option<IdentifierQuoting>,
    /// Spaces per indent level. `0` forces single-line output regardless of
    /// `line_break`.
    pub indent: usize,
    pub line_break: LineBreak,
}

impl FormatOptions {
    #[must_use]
    pub fn new(preset: Preset) -> Self {
        Self {
            preset,
            keyword_case: None,
            placeholder_style: None,
            identifier_quoting: None,
            indent: 0,
            line_break: LineBreak::default(),
        }
    }

    #[must_use]
    pub fn with_keyword_case(mut self, case: KeywordCase) -> Self {
        self.keyword_case = Some(case);
        self
    }

    #[must_use]
    pub fn with_placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = Some(style);
        self
    }

    #[must_use]
    pub fn with_identifier_quoting(mut self, quoting: IdentifierQuoting) -> Self {
        self.identifier_quoting = Some(quoting);
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize, line_break: LineBreak) -> Self {
        self.indent = indent;
        self.line_break = line_break;
        self
    }

    #[must_use]
    pub(super) fn keyword_case(&self) -> KeywordCase {
        self.keyword_case.unwrap_or_else(|| self.preset.defaults().keyword_case)
    }

    #[must_use]
    pub(super) fn placeholder_style(&self) -> PlaceholderStyle {
        self.placeholder_style
            .unwrap_or_else(|| self.preset.defaults().placeholder_style)
    }

    #[must_use]
    pub(super) fn identifier_quoting(&self) -> IdentifierQuoting {
        self.identifier_quoting
            .unwrap_or_else(|| self.preset.defaults().identifier_quoting)
    }

    #[must_use]
    pub(super) fn quote_pair(&self) -> (char, char) {
        self.preset.defaults().quote_pairs[0]
    }

    #[must_use]
    pub(super) fn single_line(&self) -> bool {
        self.indent == 0
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new(Preset::Postgres)
    }
}
