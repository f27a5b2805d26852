//! SQL statement generation from a pending changeset.
//!
//! Each pending row change becomes exactly one INSERT, UPDATE or DELETE
//! statement, emitted in ascending row order. Identifiers are double-quoted;
//! values are written with [`CellValue::to_sql_literal`].
//!
//! UPDATE and DELETE address the row by its primary key when the table has
//! one, and otherwise by equality over every column of the loaded row. The
//! full-row match is ambiguous when the table contains identical rows; this is
//! not detected.
//!
//! # Example
//!
//! ```rust
//! use grid_diff_rs::{CellValue, ChangeSet, GridSnapshot, SimpleTable};
//!
//! let table = SimpleTable::new("users", &["id", "name"], &[0]);
//! let grid = GridSnapshot::new(
//!     vec!["id".into(), "name".into()],
//!     vec![vec![5i64.into(), "Bob".into()]],
//! )
//! .unwrap();
//!
//! let mut changes = ChangeSet::new();
//! changes.update_cell(&grid, 0, 1, "O'Brien".into()).unwrap();
//!
//! assert_eq!(
//!     changes.sql_statements(&table, &grid).unwrap(),
//!     vec![r#"UPDATE "users" SET "name"='O''Brien' WHERE "id" = 5;"#]
//! );
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::builders::{CellChanges, ChangeSet, RowChange};
use crate::encoding::CellValue;
use crate::errors::Error;
use crate::schema::{DynTable, GridSnapshot};

/// Quote a SQL identifier (table or column name) with double quotes.
///
/// Escapes any embedded double quotes by doubling them.
fn quote_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push_str("\"\"");
        } else {
            out.push(c);
        }
    }
    out.push('"');
    out
}

/// The quoted names of every column of `table`, in column order.
fn quoted_columns<T: DynTable>(table: &T) -> Result<Vec<String>, Error> {
    let width = table.number_of_columns();
    (0..width)
        .map(|col_idx| {
            table
                .column_name(col_idx)
                .map(quote_identifier)
                .ok_or(Error::ColumnIndexOutOfBounds(col_idx, width))
        })
        .collect()
}

/// Looks up a quoted column name.
fn column(columns: &[String], col_idx: usize) -> Result<&str, Error> {
    columns
        .get(col_idx)
        .map(String::as_str)
        .ok_or(Error::ColumnIndexOutOfBounds(col_idx, columns.len()))
}

/// Append `WHERE` equality terms over `key` columns of the loaded row.
fn push_predicate(
    sql: &mut String,
    columns: &[String],
    key: &[usize],
    row: &[CellValue],
) -> Result<(), Error> {
    sql.push_str(" WHERE ");
    for (i, &col_idx) in key.iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        sql.push_str(column(columns, col_idx)?);
        match row.get(col_idx) {
            Some(CellValue::Null) | None => sql.push_str(" IS NULL"),
            Some(value) => {
                sql.push_str(" = ");
                sql.push_str(&value.to_sql_literal());
            }
        }
    }
    Ok(())
}

/// Format an INSERT statement with every column of the table.
fn format_insert(table_name: &str, columns: &[String], values: &[CellValue]) -> String {
    let mut sql = format!("INSERT INTO {table_name} (");
    sql.push_str(&columns.join(", "));
    sql.push_str(") VALUES (");

    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&value.to_sql_literal());
    }
    sql.push_str(");");
    sql
}

/// Format an UPDATE statement setting the edited cells.
fn format_update(
    table_name: &str,
    columns: &[String],
    key: &[usize],
    row: &[CellValue],
    cell_changes: &CellChanges,
) -> Result<String, Error> {
    let mut sql = format!("UPDATE {table_name} SET ");

    for (i, change) in cell_changes.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(column(columns, change.column_index)?);
        sql.push('=');
        sql.push_str(&change.new_value.to_sql_literal());
    }

    push_predicate(&mut sql, columns, key, row)?;
    sql.push(';');
    Ok(sql)
}

/// Format a DELETE statement.
fn format_delete(
    table_name: &str,
    columns: &[String],
    key: &[usize],
    row: &[CellValue],
) -> Result<String, Error> {
    let mut sql = format!("DELETE FROM {table_name}");
    push_predicate(&mut sql, columns, key, row)?;
    sql.push(';');
    Ok(sql)
}

impl ChangeSet {
    /// Generates one SQL statement per pending row change, in ascending row
    /// order.
    ///
    /// `snapshot` must be the snapshot the changes were recorded against; its
    /// rows supply the loaded values used to address updated and deleted rows.
    /// Column names are always taken from `table`, never from the snapshot.
    ///
    /// # Errors
    ///
    /// * `ColumnCountMismatch` - If `table` and `snapshot` disagree on the number of columns.
    /// * `ColumnIndexOutOfBounds` - If `table` lacks a name or key column it reports.
    /// * `RowIndexOutOfBounds` - If a pending change addresses a row missing from `snapshot`.
    pub fn sql_statements<T: DynTable>(
        &self,
        table: &T,
        snapshot: &GridSnapshot,
    ) -> Result<Vec<String>, Error> {
        if table.number_of_columns() != snapshot.column_count() {
            return Err(Error::ColumnCountMismatch(
                snapshot.column_count(),
                table.number_of_columns(),
            ));
        }
        let table_name = quote_identifier(table.name());
        let columns = quoted_columns(table)?;

        let pk = table.pk_indices();
        let key: Vec<usize> = if pk.is_empty() {
            if self.iter().any(|(_, change)| !change.is_insert()) {
                tracing::warn!(
                    table = table.name(),
                    "no primary key known, matching updated and deleted rows on every column"
                );
            }
            (0..columns.len()).collect()
        } else {
            pk
        };

        self.iter()
            .map(|(row_index, change)| -> Result<String, Error> {
                match change {
                    RowChange::Insert { values } => {
                        Ok(format_insert(&table_name, &columns, values))
                    }
                    RowChange::Update { cell_changes } => format_update(
                        &table_name,
                        &columns,
                        &key,
                        snapshot.checked_row(row_index)?,
                        cell_changes,
                    ),
                    RowChange::Delete => format_delete(
                        &table_name,
                        &columns,
                        &key,
                        snapshot.checked_row(row_index)?,
                    ),
                }
            })
            .collect()
    }

    /// Generates the statements of [`ChangeSet::sql_statements`] as the text
    /// shown to the operator before commit, one statement per line.
    ///
    /// [`crate::split_statements`] turns this text back into
    /// the same statements, also when quoted values span several lines.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`ChangeSet::sql_statements`].
    pub fn sql_preview<T: DynTable>(
        &self,
        table: &T,
        snapshot: &GridSnapshot,
    ) -> Result<String, Error> {
        Ok(self.sql_statements(table, snapshot)?.join("\n"))
    }
}
