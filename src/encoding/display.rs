//! Display implementation for cell values as SQL literals.

use alloc::string::{String, ToString};
use core::fmt;

use super::CellValue;

/// A borrowed [`CellValue`] formatted as a SQL literal.
///
/// Text is single-quoted with embedded quotes doubled; numbers and booleans are
/// written unquoted. No other escaping is performed.
#[derive(Debug, Clone, Copy)]
pub struct SqlLiteral<'a>(pub &'a CellValue);

impl fmt::Display for SqlLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            CellValue::Null => write!(f, "NULL"),
            CellValue::Boolean(v) => write!(f, "{v}"),
            CellValue::Integer(v) => write!(f, "{v}"),
            CellValue::Real(v) => {
                if v.is_nan() {
                    write!(f, "NULL")
                } else if v.is_infinite() {
                    if v.is_sign_positive() {
                        write!(f, "9e999")
                    } else {
                        write!(f, "-9e999")
                    }
                } else {
                    write!(f, "{v}")
                }
            }
            CellValue::Text(s) => {
                write!(f, "'")?;
                for c in s.chars() {
                    if c == '\'' {
                        write!(f, "''")?;
                    } else {
                        fmt::Write::write_char(f, c)?;
                    }
                }
                write!(f, "'")
            }
        }
    }
}

impl CellValue {
    /// Wraps the value for formatting as a SQL literal.
    #[inline]
    #[must_use]
    pub fn sql_literal(&self) -> SqlLiteral<'_> {
        SqlLiteral(self)
    }

    /// Formats the value as a SQL literal.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        self.sql_literal().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_literal() {
        assert_eq!(CellValue::Null.to_sql_literal(), "NULL");
    }

    #[test]
    fn test_text_literal_doubles_quotes() {
        assert_eq!(
            CellValue::from("O'Brien").to_sql_literal(),
            "'O''Brien'"
        );
        assert_eq!(CellValue::from("''").to_sql_literal(), "''''''");
    }

    #[test]
    fn test_numbers_and_booleans_are_unquoted() {
        assert_eq!(CellValue::Integer(-7).to_sql_literal(), "-7");
        assert_eq!(CellValue::Real(1.5).to_sql_literal(), "1.5");
        assert_eq!(CellValue::Real(28.0).to_sql_literal(), "28");
        assert_eq!(CellValue::Boolean(true).to_sql_literal(), "true");
        assert_eq!(CellValue::Boolean(false).to_sql_literal(), "false");
    }

    #[test]
    fn test_non_finite_reals() {
        assert_eq!(CellValue::Real(f64::NAN).to_sql_literal(), "NULL");
        assert_eq!(CellValue::Real(f64::INFINITY).to_sql_literal(), "9e999");
        assert_eq!(CellValue::Real(f64::NEG_INFINITY).to_sql_literal(), "-9e999");
    }
}
