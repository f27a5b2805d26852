//! Pending changeset tracking for one table view session.
//!
//! This module provides [`ChangeSet`], which holds at most one [`RowChange`]
//! per row of the loaded [`GridSnapshot`] and consolidates successive edits of
//! the same row.
//!
//! # Consolidation Rules
//!
//! | Existing | New         | Result                                      |
//! |----------|-------------|---------------------------------------------|
//! | none     | cell edit   | UPDATE with one cell (none if value equal)  |
//! | none     | delete      | DELETE                                      |
//! | INSERT   | cell edit   | INSERT with the value replaced in place     |
//! | INSERT   | delete      | Remove the insert, later rows shift down    |
//! | UPDATE   | cell edit   | Merge; a cell edited back to its old value is dropped, an empty UPDATE is removed |
//! | UPDATE   | delete      | DELETE                                      |
//! | DELETE   | cell edit   | Ignored                                     |
//! | DELETE   | delete      | DELETE                                      |
//!
//! Row indices are only meaningful against the snapshot they were taken from.
//! Whenever the snapshot is replaced (page change, sort, filter, refresh) the
//! caller must call [`ChangeSet::revert_all`] before accepting new edits.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::{
    builders::{CellChanges, ChangeKind, RowChange},
    encoding::CellValue,
    errors::Error,
    schema::GridSnapshot,
};

/// What [`ChangeSet::delete_row`] did with the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row was a pending insert and has been forgotten. The caller must
    /// remove it from the snapshot with [`GridSnapshot::remove_row`].
    InsertCancelled,
    /// The row is now marked for deletion and stays in the snapshot.
    MarkedForDeletion,
}

/// Number of pending changes of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeSummary {
    /// Pending inserts.
    pub inserts: usize,
    /// Pending updates.
    pub updates: usize,
    /// Pending deletes.
    pub deletes: usize,
}

impl ChangeSummary {
    /// Total number of pending row changes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inserts + self.updates + self.deletes
    }
}

/// The pending, uncommitted row changes of one table view session.
///
/// Entries are keyed by row index in the current [`GridSnapshot`] and iterate
/// in ascending row order.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    rows: BTreeMap<usize, RowChange>,
    generation: u64,
}

/// Two changesets are equal when they hold the same entries, regardless of
/// how many times they were cleared.
impl PartialEq for ChangeSet {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl ChangeSet {
    /// Create an empty changeset.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there is at least one pending change.
    #[inline]
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Returns true if there is no pending change.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows with a pending change.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns the pending change of a row, if any.
    #[inline]
    #[must_use]
    pub fn row_state(&self, row_index: usize) -> Option<&RowChange> {
        self.rows.get(&row_index)
    }

    /// Iterates over the pending changes in ascending row order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RowChange)> + '_ {
        self.rows.iter().map(|(row, change)| (*row, change))
    }

    /// Counts the pending changes by kind.
    #[must_use]
    pub fn summary(&self) -> ChangeSummary {
        self.rows
            .values()
            .fold(ChangeSummary::default(), |mut summary, change| {
                match change.kind() {
                    ChangeKind::Insert => summary.inserts += 1,
                    ChangeKind::Update => summary.updates += 1,
                    ChangeKind::Delete => summary.deletes += 1,
                }
                summary
            })
    }

    /// Counter bumped by every [`ChangeSet::revert_all`].
    ///
    /// Two equal generations mean no clear happened in between, so row indices
    /// recorded under the first are still valid under the second.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Records a new row.
    ///
    /// The caller must already have appended the row to `snapshot` at
    /// `row_index`, see [`GridSnapshot::push_row`].
    ///
    /// # Errors
    ///
    /// * `RowIndexOutOfBounds` - If `row_index` is not a row of the snapshot.
    /// * `ColumnCountMismatch` - If `values` does not have one value per column.
    /// * `RowAlreadyTracked` - If the row already has a pending change.
    pub fn insert_row(
        &mut self,
        snapshot: &GridSnapshot,
        row_index: usize,
        values: Vec<CellValue>,
    ) -> Result<(), Error> {
        snapshot.checked_row(row_index)?;
        if values.len() != snapshot.column_count() {
            return Err(Error::ColumnCountMismatch(
                values.len(),
                snapshot.column_count(),
            ));
        }
        if self.rows.contains_key(&row_index) {
            return Err(Error::RowAlreadyTracked(row_index));
        }
        tracing::debug!(row = row_index, "pending insert");
        self.rows.insert(row_index, RowChange::Insert { values });
        Ok(())
    }

    /// Records an edit of one cell.
    ///
    /// The column name and the loaded value of the cell are read from
    /// `snapshot`. Edits of a pending insert change its values in place; edits
    /// of a row marked for deletion are ignored.
    ///
    /// # Errors
    ///
    /// * `RowIndexOutOfBounds` - If `row_index` is not a row of the snapshot.
    /// * `ColumnIndexOutOfBounds` - If `column_index` is not a column of the snapshot.
    pub fn update_cell(
        &mut self,
        snapshot: &GridSnapshot,
        row_index: usize,
        column_index: usize,
        new_value: CellValue,
    ) -> Result<(), Error> {
        let row = snapshot.checked_row(row_index)?;
        let (Some(column_name), Some(old_value)) =
            (snapshot.columns().get(column_index), row.get(column_index))
        else {
            return Err(Error::ColumnIndexOutOfBounds(
                column_index,
                snapshot.column_count(),
            ));
        };

        let Some(existing) = self.rows.get_mut(&row_index) else {
            let mut cell_changes = CellChanges::default();
            cell_changes.record(column_index, column_name, old_value, new_value);
            if !cell_changes.is_empty() {
                tracing::debug!(row = row_index, column = column_index, "pending update");
                self.rows
                    .insert(row_index, RowChange::Update { cell_changes });
            }
            return Ok(());
        };

        let now_unchanged = match existing {
            RowChange::Insert { values } => {
                if let Some(slot) = values.get_mut(column_index) {
                    *slot = new_value;
                }
                false
            }
            RowChange::Update { cell_changes } => {
                cell_changes.record(column_index, column_name, old_value, new_value);
                cell_changes.is_empty()
            }
            RowChange::Delete => {
                tracing::debug!(row = row_index, "ignoring edit of a row marked for deletion");
                false
            }
        };
        if now_unchanged {
            tracing::debug!(row = row_index, "row reverted to its loaded values");
            self.rows.remove(&row_index);
        }
        Ok(())
    }

    /// Deletes a row.
    ///
    /// A pending insert is forgotten outright, since it never existed in the
    /// database; every tracked row after it moves one index down, matching the
    /// removal the caller then performs on the snapshot. Any other row is
    /// marked for deletion, replacing its pending cell edits.
    ///
    /// # Errors
    ///
    /// * `RowIndexOutOfBounds` - If `row_index` is not a row of the snapshot.
    pub fn delete_row(
        &mut self,
        snapshot: &GridSnapshot,
        row_index: usize,
    ) -> Result<DeleteOutcome, Error> {
        snapshot.checked_row(row_index)?;
        if self.rows.get(&row_index).is_some_and(RowChange::is_insert) {
            self.cancel_insert(row_index);
            return Ok(DeleteOutcome::InsertCancelled);
        }
        tracing::debug!(row = row_index, "pending delete");
        self.rows.insert(row_index, RowChange::Delete);
        Ok(DeleteOutcome::MarkedForDeletion)
    }

    /// Discards the pending change of one row and returns it.
    ///
    /// Reverting a pending insert cancels it with the same re-indexing as
    /// [`ChangeSet::delete_row`]; the caller must remove the row from the
    /// snapshot.
    pub fn revert_row(&mut self, row_index: usize) -> Option<RowChange> {
        if self.rows.get(&row_index).is_some_and(RowChange::is_insert) {
            return self.cancel_insert(row_index);
        }
        self.rows.remove(&row_index)
    }

    /// Discards every pending change.
    ///
    /// Must be called after each successful commit and whenever the snapshot
    /// is replaced.
    pub fn revert_all(&mut self) {
        tracing::debug!(discarded = self.rows.len(), "reverting all pending changes");
        self.rows.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns the value currently displayed for a cell: the pending value if
    /// the cell was edited or belongs to a pending insert, the loaded value
    /// otherwise.
    #[must_use]
    pub fn cell_value<'a>(
        &'a self,
        snapshot: &'a GridSnapshot,
        row_index: usize,
        column_index: usize,
    ) -> Option<&'a CellValue> {
        match self.rows.get(&row_index) {
            Some(RowChange::Insert { values }) => values.get(column_index),
            Some(RowChange::Update { cell_changes }) => cell_changes
                .get(column_index)
                .map(|change| &change.new_value)
                .or_else(|| snapshot.cell(row_index, column_index)),
            Some(RowChange::Delete) | None => snapshot.cell(row_index, column_index),
        }
    }

    /// Whether a cell should be highlighted as modified: every cell of a
    /// pending insert, and the edited cells of a pending update.
    #[must_use]
    pub fn is_cell_modified(&self, row_index: usize, column_index: usize) -> bool {
        match self.rows.get(&row_index) {
            Some(RowChange::Insert { .. }) => true,
            Some(RowChange::Update { cell_changes }) => cell_changes.get(column_index).is_some(),
            Some(RowChange::Delete) | None => false,
        }
    }

    /// Removes a pending insert and shifts every later entry one row down.
    fn cancel_insert(&mut self, row_index: usize) -> Option<RowChange> {
        let removed = self.rows.remove(&row_index);
        let later = self.rows.split_off(&row_index);
        self.rows
            .extend(later.into_iter().map(|(row, change)| (row - 1, change)));
        tracing::debug!(row = row_index, "pending insert cancelled");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn users() -> GridSnapshot {
        GridSnapshot::new(
            vec!["id".into(), "name".into(), "age".into()],
            vec![
                vec![1i64.into(), "Ann".into(), 41i64.into()],
                vec![2i64.into(), "Bob".into(), 25i64.into()],
                vec![3i64.into(), "Cid".into(), 30i64.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_edit_and_revert_leaves_no_change() {
        let grid = users();
        let mut changes = ChangeSet::new();
        changes.update_cell(&grid, 2, 2, 31i64.into()).unwrap();
        assert!(changes.has_changes());
        changes.update_cell(&grid, 2, 2, 30i64.into()).unwrap();
        assert!(!changes.has_changes());
        assert!(changes.row_state(2).is_none());
    }

    #[test]
    fn test_large_integer_edit_to_nearby_real_is_kept() {
        let grid = GridSnapshot::new(
            vec!["id".into(), "counter".into()],
            vec![vec![1i64.into(), 9_007_199_254_740_993i64.into()]],
        )
        .unwrap();
        let mut changes = ChangeSet::new();
        changes
            .update_cell(&grid, 0, 1, CellValue::Real(9_007_199_254_740_992.0))
            .unwrap();
        assert!(changes.is_cell_modified(0, 1));
    }

    #[test]
    fn test_partial_revert_keeps_other_cells() {
        let grid = users();
        let mut changes = ChangeSet::new();
        changes.update_cell(&grid, 0, 1, "Anna".into()).unwrap();
        changes.update_cell(&grid, 0, 2, 42i64.into()).unwrap();
        changes.update_cell(&grid, 0, 1, "Ann".into()).unwrap();
        let Some(RowChange::Update { cell_changes }) = changes.row_state(0) else {
            panic!("expected an update");
        };
        assert_eq!(cell_changes.len(), 1);
        assert_eq!(cell_changes.get(2).unwrap().column_name, "age");
    }

    #[test]
    fn test_insert_then_delete_cancels() {
        let mut grid = users();
        let mut changes = ChangeSet::new();
        let row = grid.push_row(vec![CellValue::Null; 3]).unwrap();
        changes.insert_row(&grid, row, vec![CellValue::Null; 3]).unwrap();
        assert_eq!(
            changes.delete_row(&grid, row).unwrap(),
            DeleteOutcome::InsertCancelled
        );
        assert!(!changes.has_changes());
    }

    #[test]
    fn test_edit_of_insert_stays_insert() {
        let mut grid = users();
        let mut changes = ChangeSet::new();
        let row = grid.push_row(vec![CellValue::Null; 3]).unwrap();
        changes.insert_row(&grid, row, vec![CellValue::Null; 3]).unwrap();
        changes.update_cell(&grid, row, 1, "Dee".into()).unwrap();
        // Editing back to the initial value does not cancel an insert.
        changes.update_cell(&grid, row, 1, CellValue::Null).unwrap();
        changes.update_cell(&grid, row, 1, "Dee".into()).unwrap();
        assert_eq!(
            changes.row_state(row),
            Some(&RowChange::Insert {
                values: vec![CellValue::Null, "Dee".into(), CellValue::Null]
            })
        );
        assert!(changes.is_cell_modified(row, 0));
    }

    #[test]
    fn test_delete_overrides_update_and_ignores_edits() {
        let grid = users();
        let mut changes = ChangeSet::new();
        changes.update_cell(&grid, 1, 1, "Bobby".into()).unwrap();
        assert_eq!(
            changes.delete_row(&grid, 1).unwrap(),
            DeleteOutcome::MarkedForDeletion
        );
        changes.update_cell(&grid, 1, 2, 99i64.into()).unwrap();
        assert_eq!(changes.row_state(1), Some(&RowChange::Delete));
        assert_eq!(changes.cell_value(&grid, 1, 2), Some(&CellValue::Integer(25)));
    }

    #[test]
    fn test_cancelled_insert_shifts_later_inserts() {
        let mut grid = users();
        let mut changes = ChangeSet::new();
        let first = grid.push_row(vec![CellValue::Null, "x".into(), CellValue::Null]).unwrap();
        changes
            .insert_row(&grid, first, vec![CellValue::Null, "x".into(), CellValue::Null])
            .unwrap();
        let second = grid.push_row(vec![CellValue::Null, "y".into(), CellValue::Null]).unwrap();
        changes
            .insert_row(&grid, second, vec![CellValue::Null, "y".into(), CellValue::Null])
            .unwrap();

        assert_eq!(
            changes.delete_row(&grid, first).unwrap(),
            DeleteOutcome::InsertCancelled
        );
        grid.remove_row(first).unwrap();

        assert_eq!(changes.len(), 1);
        assert_eq!(changes.cell_value(&grid, first, 1), Some(&CellValue::from("y")));
        assert!(changes.row_state(second).is_none());
    }

    #[test]
    fn test_out_of_range_indices_are_rejected() {
        let grid = users();
        let mut changes = ChangeSet::new();
        assert_eq!(
            changes.update_cell(&grid, 3, 0, CellValue::Null).unwrap_err(),
            Error::RowIndexOutOfBounds(3, 3)
        );
        assert_eq!(
            changes.update_cell(&grid, 0, 3, CellValue::Null).unwrap_err(),
            Error::ColumnIndexOutOfBounds(3, 3)
        );
        assert_eq!(
            changes.delete_row(&grid, 10).unwrap_err(),
            Error::RowIndexOutOfBounds(10, 3)
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn test_insert_preconditions() {
        let grid = users();
        let mut changes = ChangeSet::new();
        assert_eq!(
            changes.insert_row(&grid, 0, vec![CellValue::Null]).unwrap_err(),
            Error::ColumnCountMismatch(1, 3)
        );
        changes.delete_row(&grid, 0).unwrap();
        assert_eq!(
            changes
                .insert_row(&grid, 0, vec![CellValue::Null; 3])
                .unwrap_err(),
            Error::RowAlreadyTracked(0)
        );
    }

    #[test]
    fn test_revert_row_and_all() {
        let grid = users();
        let mut changes = ChangeSet::new();
        changes.update_cell(&grid, 0, 1, "Anna".into()).unwrap();
        changes.delete_row(&grid, 2).unwrap();
        assert_eq!(changes.revert_row(2), Some(RowChange::Delete));
        assert_eq!(changes.revert_row(2), None);
        assert_eq!(changes.len(), 1);

        let generation = changes.generation();
        changes.revert_all();
        assert!(!changes.has_changes());
        assert_eq!(changes.generation(), generation + 1);
    }

    #[test]
    fn test_summary_and_displayed_values() {
        let mut grid = users();
        let mut changes = ChangeSet::new();
        changes.update_cell(&grid, 0, 1, "Anna".into()).unwrap();
        changes.delete_row(&grid, 1).unwrap();
        let row = grid.push_row(vec![CellValue::Null; 3]).unwrap();
        changes.insert_row(&grid, row, vec![CellValue::Null; 3]).unwrap();

        assert_eq!(
            changes.summary(),
            ChangeSummary {
                inserts: 1,
                updates: 1,
                deletes: 1
            }
        );
        assert_eq!(changes.summary().total(), changes.len());
        assert_eq!(changes.cell_value(&grid, 0, 1), Some(&CellValue::from("Anna")));
        assert_eq!(changes.cell_value(&grid, 0, 2), Some(&CellValue::Integer(41)));
        assert!(changes.is_cell_modified(0, 1));
        assert!(!changes.is_cell_modified(0, 2));
        assert!(!changes.is_cell_modified(1, 1));

        let rows: Vec<usize> = changes.iter().map(|(row, _)| row).collect();
        assert_eq!(rows, vec![0, 1, 3]);
    }
}
