//! SQL data type definitions.

use core::fmt;

/// SQL data types usable in `CAST(... AS ...)` and array element positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// Decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },
    /// Numeric (alias for Decimal).
    Numeric {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Text (variable length, no limit).
    Text,
    /// Boolean.
    Boolean,
    /// Date.
    Date,
    /// Time.
    Time,
    /// Timestamp.
    Timestamp {
        /// `TIMESTAMP WITH TIME ZONE` when true.
        with_time_zone: bool,
    },
    /// DateTime (MySQL/SQLite-style).
    Datetime,
    /// Interval.
    Interval,
    /// `<type>[]` array of another type (Postgres).
    Array(Box<DataType>),
    /// Database-specific type not otherwise modeled.
    Custom(String),
}

impl DataType {
    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Smallint => String::from("SMALLINT"),
            Self::Integer => String::from("INTEGER"),
            Self::Bigint => String::from("BIGINT"),
            Self::Real => String::from("REAL"),
            Self::Double => String::from("DOUBLE PRECISION"),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("DECIMAL({p}, {s})"),
                (Some(p), None) => format!("DECIMAL({p})"),
                _ => String::from("DECIMAL"),
            },
            Self::Numeric { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("NUMERIC({p}, {s})"),
                (Some(p), None) => format!("NUMERIC({p})"),
                _ => String::from("NUMERIC"),
            },
            Self::Char(len) => match len {
                Some(n) => format!("CHAR({n})"),
                None => String::from("CHAR"),
            },
            Self::Varchar(len) => match len {
                Some(n) => format!("VARCHAR({n})"),
                None => String::from("VARCHAR"),
            },
            Self::Text => String::from("TEXT"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Date => String::from("DATE"),
            Self::Time => String::from("TIME"),
            Self::Timestamp { with_time_zone } => {
                if *with_time_zone {
                    String::from("TIMESTAMP WITH TIME ZONE")
                } else {
                    String::from("TIMESTAMP")
                }
            }
            Self::Datetime => String::from("DATETIME"),
            Self::Interval => String::from("INTERVAL"),
            Self::Array(inner) => format!("{}[]", inner.to_sql()),
            Self::Custom(name) => name.clone(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_types_render() {
        assert_eq!(DataType::Integer.to_sql(), "INTEGER");
        assert_eq!(DataType::Varchar(Some(255)).to_sql(), "VARCHAR(255)");
        assert_eq!(
            DataType::Decimal {
                precision: Some(10),
                scale: Some(2)
            }
            .to_sql(),
            "DECIMAL(10, 2)"
        );
    }

    #[test]
    fn array_type_renders_with_brackets() {
        assert_eq!(
            DataType::Array(Box::new(DataType::Integer)).to_sql(),
            "INTEGER[]"
        );
    }

    #[test]
    fn timestamp_with_time_zone() {
        assert_eq!(
            DataType::Timestamp {
                with_time_zone: true
            }
            .to_sql(),
            "TIMESTAMP WITH TIME ZONE"
        );
    }
}
