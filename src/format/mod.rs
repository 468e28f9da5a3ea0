//! SQL rendering: turns a [`crate::ast::QueryAst`] back into text plus a
//! collected parameter payload.
//!
//! AST nodes never implement `Display` — [`SqlFormatter`] is the only path
//! from AST to text, so every rendering decision (keyword case, identifier
//! quoting, placeholder style) is made in one place under explicit options.
//! An older, undifferentiated `Formatter` type from the upstream project is
//! not carried forward; only the preset-aware `SqlFormatter` is implemented.

mod error;
mod options;
mod writer;

pub use error::FormatError;
pub use options::{FormatOptions, LineBreak, Preset};
pub use writer::{FormattedQuery, ParamsPayload, SqlFormatter};
