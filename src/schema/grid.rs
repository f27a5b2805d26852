//! The loaded page of a table, as shown in the grid.

use alloc::string::String;
use alloc::vec::Vec;

use crate::encoding::CellValue;
use crate::errors::Error;

/// An ordered page of rows paired with the column names.
///
/// The snapshot is owned by the view layer. Pending edits never modify it: the
/// changeset only reads it to resolve the original value of a cell. The two
/// mutations the caller performs in lock-step with the changeset, appending a
/// newly inserted row and removing a cancelled one, are provided as
/// [`GridSnapshot::push_row`] and [`GridSnapshot::remove_row`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SnapshotParts"))]
pub struct GridSnapshot {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

/// Unvalidated snapshot payload, as returned by the query backend.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SnapshotParts {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
}

#[cfg(feature = "serde")]
impl TryFrom<SnapshotParts> for GridSnapshot {
    type Error = Error;

    fn try_from(parts: SnapshotParts) -> Result<Self, Self::Error> {
        Self::new(parts.columns, parts.rows)
    }
}

impl GridSnapshot {
    /// Creates a snapshot from column names and rows.
    ///
    /// # Errors
    ///
    /// * `ColumnCountMismatch` - If a row does not have one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, Error> {
        if let Some(row) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(Error::ColumnCountMismatch(row.len(), columns.len()));
        }
        Ok(Self { columns, rows })
    }

    /// Get the column names.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the number of columns.
    #[inline]
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the snapshot holds no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get all rows.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Get a row by index.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Get a cell by row and column index.
    #[inline]
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Returns the row at `index`, or an error naming the snapshot size.
    pub(crate) fn checked_row(&self, index: usize) -> Result<&[CellValue], Error> {
        self.row(index)
            .ok_or(Error::RowIndexOutOfBounds(index, self.rows.len()))
    }

    /// Appends a row and returns its index.
    ///
    /// # Errors
    ///
    /// * `ColumnCountMismatch` - If the row does not have one value per column.
    pub fn push_row(&mut self, values: Vec<CellValue>) -> Result<usize, Error> {
        if values.len() != self.columns.len() {
            return Err(Error::ColumnCountMismatch(values.len(), self.columns.len()));
        }
        self.rows.push(values);
        Ok(self.rows.len() - 1)
    }

    /// Removes the row at `index`, shifting later rows down by one.
    ///
    /// # Errors
    ///
    /// * `RowIndexOutOfBounds` - If there is no row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<Vec<CellValue>, Error> {
        if index >= self.rows.len() {
            return Err(Error::RowIndexOutOfBounds(index, self.rows.len()));
        }
        Ok(self.rows.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn snapshot() -> GridSnapshot {
        GridSnapshot::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![1i64.into(), "a".into()],
                vec![2i64.into(), CellValue::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = GridSnapshot::new(
            vec!["id".into(), "name".into()],
            vec![vec![1i64.into()]],
        )
        .unwrap_err();
        assert_eq!(err, Error::ColumnCountMismatch(1, 2));
    }

    #[test]
    fn test_accessors() {
        let grid = snapshot();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell(1, 1), Some(&CellValue::Null));
        assert_eq!(grid.cell(2, 0), None);
        assert_eq!(
            grid.checked_row(5).unwrap_err(),
            Error::RowIndexOutOfBounds(5, 2)
        );
    }

    #[test]
    fn test_push_and_remove() {
        let mut grid = snapshot();
        let index = grid.push_row(vec![CellValue::Null, "new".into()]).unwrap();
        assert_eq!(index, 2);
        assert_eq!(
            grid.push_row(vec![CellValue::Null]).unwrap_err(),
            Error::ColumnCountMismatch(1, 2)
        );
        let removed = grid.remove_row(2).unwrap();
        assert_eq!(removed[1], CellValue::from("new"));
        assert_eq!(grid.len(), 2);
        assert!(grid.remove_row(2).is_err());
    }
}
