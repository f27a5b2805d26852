//! Cell value representation and its text and SQL literal forms.
//!
//! A grid cell holds one [`CellValue`]. The same value has two textual forms:
//! the editable text shown in the cell editor ([`CellValue::to_edit_text`],
//! [`CellValue::from_edit_text`]) and the SQL literal used by the statement
//! synthesizer ([`CellValue::to_sql_literal`]).

mod display;
mod edit_text;
mod value;

pub use display::SqlLiteral;
pub use edit_text::Coercion;
pub use value::CellValue;
