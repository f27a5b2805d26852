//! Enumeration of pending row changes (insert, update, delete), defined so that
//! a row can only ever hold one of them.

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap as IndexMapRaw;

use crate::encoding::CellValue;

/// `IndexMap` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// A single edited cell of an existing row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellChange {
    /// Index of the column in the grid.
    pub column_index: usize,
    /// Name of the column at the time of the edit.
    pub column_name: String,
    /// The value loaded from the database.
    pub old_value: CellValue,
    /// The value entered by the operator.
    pub new_value: CellValue,
}

/// The edited cells of one row, keyed by column index in first-edit order.
///
/// Holds at most one entry per column, and never an entry whose new value
/// equals its old value.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<CellChange>", into = "Vec<CellChange>")
)]
pub struct CellChanges {
    cells: IndexMap<usize, CellChange>,
}

/// Order-sensitive comparison: two rows are equal when they edit the same
/// cells, in the same order, to the same values.
impl PartialEq for CellChanges {
    fn eq(&self, other: &Self) -> bool {
        self.cells.values().eq(other.cells.values())
    }
}

impl CellChanges {
    /// Returns the change recorded for a column, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, column_index: usize) -> Option<&CellChange> {
        self.cells.get(&column_index)
    }

    /// Returns the number of edited cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no cell is edited.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over the edited cells in first-edit order.
    pub fn iter(&self) -> impl Iterator<Item = &CellChange> + '_ {
        self.cells.values()
    }

    /// Records an edit, coalescing with any earlier edit of the same column.
    ///
    /// An edit back to the loaded value removes the column's entry.
    pub(crate) fn record(
        &mut self,
        column_index: usize,
        column_name: &str,
        old_value: &CellValue,
        new_value: CellValue,
    ) {
        if let Some(existing) = self.cells.get_mut(&column_index) {
            if existing.old_value == new_value {
                self.cells.shift_remove(&column_index);
            } else {
                existing.new_value = new_value;
            }
        } else if *old_value != new_value {
            self.cells.insert(
                column_index,
                CellChange {
                    column_index,
                    column_name: column_name.into(),
                    old_value: old_value.clone(),
                    new_value,
                },
            );
        }
    }
}

impl From<Vec<CellChange>> for CellChanges {
    fn from(changes: Vec<CellChange>) -> Self {
        Self {
            cells: changes
                .into_iter()
                .filter(|change| change.old_value != change.new_value)
                .map(|change| (change.column_index, change))
                .collect(),
        }
    }
}

impl From<CellChanges> for Vec<CellChange> {
    fn from(changes: CellChanges) -> Self {
        changes.cells.into_values().collect()
    }
}

/// The kind of a [`RowChange`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A new row.
    Insert,
    /// Edited cells of an existing row.
    Update,
    /// An existing row marked for removal.
    Delete,
}

/// The pending change of one row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum RowChange {
    /// A row appended to the snapshot, not yet persisted. Edits of an inserted
    /// row update these values in place.
    Insert {
        /// The row values, one per column.
        values: Vec<CellValue>,
    },
    /// One or more edited cells of a loaded row.
    Update {
        /// The edited cells.
        cell_changes: CellChanges,
    },
    /// A loaded row marked for removal. The row stays in the snapshot until
    /// the commit succeeds.
    Delete,
}

impl RowChange {
    /// Returns the kind of this change.
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            RowChange::Insert { .. } => ChangeKind::Insert,
            RowChange::Update { .. } => ChangeKind::Update,
            RowChange::Delete => ChangeKind::Delete,
        }
    }

    /// Check if the change is an insert.
    #[inline]
    #[must_use]
    pub fn is_insert(&self) -> bool {
        matches!(self, RowChange::Insert { .. })
    }

    /// Check if the change is an update.
    #[inline]
    #[must_use]
    pub fn is_update(&self) -> bool {
        matches!(self, RowChange::Update { .. })
    }

    /// Check if the change is a delete.
    #[inline]
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, RowChange::Delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_edit_then_revert_removes_entry() {
        let mut cells = CellChanges::default();
        let old = CellValue::Integer(30);
        cells.record(2, "age", &old, CellValue::Integer(31));
        assert_eq!(cells.len(), 1);
        cells.record(2, "age", &old, CellValue::Integer(32));
        assert_eq!(cells.len(), 1);
        assert_eq!(cells.get(2).unwrap().new_value, CellValue::Integer(32));
        assert_eq!(cells.get(2).unwrap().old_value, CellValue::Integer(30));
        cells.record(2, "age", &old, CellValue::Real(30.0));
        assert!(cells.is_empty());
    }

    #[test]
    fn test_edit_to_same_value_is_not_recorded() {
        let mut cells = CellChanges::default();
        cells.record(0, "name", &CellValue::from("Bob"), CellValue::from("Bob"));
        assert!(cells.is_empty());
    }

    #[test]
    fn test_first_edit_order_is_kept() {
        let mut cells = CellChanges::default();
        cells.record(2, "c", &CellValue::Null, 1i64.into());
        cells.record(0, "a", &CellValue::Null, 2i64.into());
        cells.record(2, "c", &CellValue::Null, 3i64.into());
        let order: Vec<usize> = cells.iter().map(|c| c.column_index).collect();
        assert_eq!(order, vec![2, 0]);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(RowChange::Delete.kind(), ChangeKind::Delete);
        assert!(RowChange::Insert { values: vec![] }.is_insert());
        assert!(
            RowChange::Update {
                cell_changes: CellChanges::default()
            }
            .is_update()
        );
    }
}
