//! The cell value type.

use alloc::string::{String, ToString};

/// A single cell of a table snapshot.
///
/// Numbers are split into [`CellValue::Integer`] and [`CellValue::Real`], but
/// compare equal across the two variants when they are numerically equal, so
/// that `Integer(30) == Real(30.0)`.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CellValue {
    /// SQL NULL
    #[default]
    Null,
    /// Boolean
    Boolean(bool),
    /// Integer
    Integer(i64),
    /// IEEE 754 floating point
    Real(f64),
    /// UTF-8 text
    Text(String),
}

impl CellValue {
    /// Check if the value is Null.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Check if the value is an integer or a real.
    #[inline]
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Real(_))
    }

    /// Check if the value is a boolean.
    #[inline]
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, CellValue::Boolean(_))
    }
}

/// Exact comparison of an integer and a real, without rounding the integer.
#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
fn integer_eq_real(i: i64, r: f64) -> bool {
    // i64::MIN is exactly -2^63; i64::MAX rounds up to 2^63, which is out of range.
    const LOWER: f64 = -9_223_372_036_854_775_808.0;
    if !(LOWER..-LOWER).contains(&r) {
        return false;
    }
    // In range, the cast truncates; converting back is exact iff `r` is integral.
    let truncated = r as i64;
    truncated as f64 == r && truncated == i
}

impl PartialEq for CellValue {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a == b,
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::Real(a), CellValue::Real(b)) => a == b,
            (CellValue::Integer(i), CellValue::Real(r))
            | (CellValue::Real(r), CellValue::Integer(i)) => integer_eq_real(*i, *r),
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Integer(i64::from(v))
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Real(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Boolean(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_across_variants() {
        assert_eq!(CellValue::Integer(30), CellValue::Real(30.0));
        assert_eq!(CellValue::Real(30.0), CellValue::Integer(30));
        assert_ne!(CellValue::Integer(30), CellValue::Real(30.5));
    }

    #[test]
    fn test_numeric_equality_beyond_f64_precision() {
        let two_pow_53 = 9_007_199_254_740_992_i64;
        assert_eq!(CellValue::Integer(two_pow_53), CellValue::Real(9_007_199_254_740_992.0));
        assert_ne!(
            CellValue::Integer(two_pow_53 + 1),
            CellValue::Real(9_007_199_254_740_992.0)
        );
        assert_eq!(CellValue::Integer(i64::MIN), CellValue::Real(-9_223_372_036_854_775_808.0));
        assert_ne!(CellValue::Integer(i64::MAX), CellValue::Real(9_223_372_036_854_775_808.0));
        assert_ne!(CellValue::Integer(0), CellValue::Real(f64::NAN));
        assert_ne!(CellValue::Integer(i64::MAX), CellValue::Real(f64::INFINITY));
    }

    #[test]
    fn test_no_equality_across_kinds() {
        assert_ne!(CellValue::Text("1".into()), CellValue::Integer(1));
        assert_ne!(CellValue::Boolean(true), CellValue::Integer(1));
        assert_ne!(CellValue::Null, CellValue::Text(String::new()));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(CellValue::from(None::<i64>), CellValue::Null);
        assert_eq!(CellValue::from(Some("x")), CellValue::Text("x".into()));
    }
}
