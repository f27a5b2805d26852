//! Dynamic (runtime) table descriptor trait.
use core::fmt::Debug;

use alloc::vec::Vec;

/// A table descriptor known at runtime.
///
/// Identifiers returned by a descriptor are trusted to come from introspected
/// schema metadata; they are quoted but never validated.
pub trait DynTable: Debug {
    /// The table name.
    fn name(&self) -> &str;

    /// The number of columns in the table.
    fn number_of_columns(&self) -> usize;

    /// Get the column name for a given index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn column_name(&self, index: usize) -> Option<&str>;

    /// The 0-based position of the column in the primary key, or `None` if
    /// the column is not part of it.
    fn primary_key_index(&self, col_idx: usize) -> Option<usize>;

    /// Get the column indices that are part of the primary key, in PK order.
    fn pk_indices(&self) -> Vec<usize> {
        let mut pk_cols: Vec<(usize, usize)> = (0..self.number_of_columns())
            .filter_map(|col_idx| {
                self.primary_key_index(col_idx)
                    .map(|pk_ordinal| (pk_ordinal, col_idx))
            })
            .collect();
        pk_cols.sort_by_key(|(ordinal, _)| *ordinal);
        pk_cols.into_iter().map(|(_, col_idx)| col_idx).collect()
    }
}

impl<T: DynTable> DynTable for &T {
    #[inline]
    fn name(&self) -> &str {
        T::name(self)
    }

    #[inline]
    fn number_of_columns(&self) -> usize {
        T::number_of_columns(self)
    }

    #[inline]
    fn column_name(&self, index: usize) -> Option<&str> {
        T::column_name(self, index)
    }

    #[inline]
    fn primary_key_index(&self, col_idx: usize) -> Option<usize> {
        T::primary_key_index(self, col_idx)
    }

    #[inline]
    fn pk_indices(&self) -> Vec<usize> {
        T::pk_indices(self)
    }
}
