//! Conversion between cell values and the text shown in the cell editor.

use alloc::string::{String, ToString};

use super::CellValue;

/// The result of coercing editor text back into a [`CellValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct Coercion {
    /// The coerced value.
    pub value: CellValue,
    /// Whether numeric parsing failed and the value defaulted to `0`.
    pub fell_back: bool,
}

impl Coercion {
    fn exact(value: CellValue) -> Self {
        Self {
            value,
            fell_back: false,
        }
    }
}

/// Parses numeric editor text, integers first.
fn parse_number(text: &str) -> Option<CellValue> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(CellValue::Integer(i));
    }
    match trimmed.parse::<f64>() {
        Ok(r) if r.is_finite() => Some(CellValue::Real(r)),
        _ => None,
    }
}

impl CellValue {
    /// Returns the text shown in the cell editor for this value.
    ///
    /// `NULL` becomes the empty string, every other value its display form.
    #[must_use]
    pub fn to_edit_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Boolean(v) => v.to_string(),
            CellValue::Integer(v) => v.to_string(),
            CellValue::Real(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Coerces editor text into a value of the same kind as `original`.
    ///
    /// * The empty string and a case-insensitive `null` become `NULL`.
    /// * If `original` is numeric, the text is parsed as a number; text that
    ///   does not parse becomes `0` and the returned [`Coercion`] is flagged.
    /// * If `original` is a boolean, the result is `true` iff the text is a
    ///   case-insensitive `true`.
    /// * Otherwise the text is kept verbatim.
    #[must_use]
    pub fn coerce_edit_text(text: &str, original: &CellValue) -> Coercion {
        if text.is_empty() || text.eq_ignore_ascii_case("null") {
            return Coercion::exact(CellValue::Null);
        }
        match original {
            CellValue::Integer(_) | CellValue::Real(_) => match parse_number(text) {
                Some(value) => Coercion::exact(value),
                None => Coercion {
                    value: CellValue::Integer(0),
                    fell_back: true,
                },
            },
            CellValue::Boolean(_) => {
                Coercion::exact(CellValue::Boolean(text.eq_ignore_ascii_case("true")))
            }
            CellValue::Null | CellValue::Text(_) => Coercion::exact(CellValue::Text(text.into())),
        }
    }

    /// Coerces editor text into a value, see [`CellValue::coerce_edit_text`].
    ///
    /// This is best-effort coercion, not validation: malformed numeric input
    /// silently becomes `0`.
    #[must_use]
    pub fn from_edit_text(text: &str, original: &CellValue) -> CellValue {
        let coercion = Self::coerce_edit_text(text, original);
        if coercion.fell_back {
            tracing::debug!(text, "numeric cell text did not parse, defaulting to 0");
        }
        coercion.value
    }
}
