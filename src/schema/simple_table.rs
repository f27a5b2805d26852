//! Simple table descriptor for SQL generation.
//!
//! This module provides [`SimpleTable`], a descriptor holding the table name,
//! the column names in grid order and the primary key column indices.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::{ColumnInfo, DynTable};

/// A simple table descriptor with column names for SQL generation.
///
/// # Example
///
/// ```rust
/// use grid_diff_rs::{DynTable, SimpleTable};
///
/// let table = SimpleTable::new("users", &["id", "name", "age"], &[0]);
/// assert_eq!(table.name(), "users");
/// assert_eq!(table.pk_indices(), vec![0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleTable {
    /// The table name.
    name: String,
    /// Column names in order.
    columns: Vec<String>,
    /// Primary key column indices, in PK order.
    pk: Vec<usize>,
}

impl SimpleTable {
    /// Create a new simple table descriptor.
    ///
    /// # Arguments
    ///
    /// * `name` - The table name.
    /// * `columns` - The column names in order.
    /// * `pk_indices` - Indices of primary key columns (in PK order). Empty when
    ///   the table has no known primary key.
    ///
    /// # Panics
    ///
    /// Panics if any `pk_indices` value is out of bounds.
    #[must_use]
    pub fn new<S: AsRef<str>>(name: impl Into<String>, columns: &[S], pk_indices: &[usize]) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        for &col_idx in pk_indices {
            assert!(col_idx < columns.len(), "PK index out of bounds");
        }
        Self {
            name: name.into(),
            columns,
            pk: pk_indices.to_vec(),
        }
    }

    /// Create a descriptor from the column list returned by table structure
    /// introspection. Every column flagged `is_primary_key` joins the key, in
    /// column order.
    #[must_use]
    pub fn from_structure(name: impl Into<String>, columns: &[ColumnInfo]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.name.clone()).collect(),
            pk: columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_primary_key)
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// Get the column names.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Get the column index by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

impl DynTable for SimpleTable {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    #[inline]
    fn primary_key_index(&self, col_idx: usize) -> Option<usize> {
        self.pk.iter().position(|&i| i == col_idx)
    }

    #[inline]
    fn pk_indices(&self) -> Vec<usize> {
        self.pk.clone()
    }
}
