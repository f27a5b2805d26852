//! Testing utilities backed by an in-memory SQLite database.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`SqliteBackend`]: a [`MutationBackend`] applying each batch in one SQLite transaction
//! - [`SqliteBackend::snapshot`]: load the result of a query as a [`GridSnapshot`]

use alloc::string::String;
use alloc::vec::Vec;
use core::future::{Future, ready};

use rusqlite::Connection;
use rusqlite::types::ValueRef;

use crate::{CellValue, GridSnapshot, MutationBackend};

/// Errors reported by [`SqliteBackend`].
#[derive(Debug, thiserror::Error)]
pub enum SqliteBackendError {
    /// SQLite rejected a statement.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    /// In strict mode, a statement did not affect exactly one row.
    #[error("statement {statement} affected {affected} rows, expected exactly one")]
    RowCountMismatch {
        /// Position of the statement in the batch.
        statement: usize,
        /// Number of rows the statement affected.
        affected: usize,
    },
    /// A query result could not be turned into a snapshot.
    #[error(transparent)]
    Snapshot(#[from] crate::Error),
}

/// A [`MutationBackend`] over a SQLite connection.
///
/// Every batch runs inside one transaction, so a failing statement rolls back
/// the statements before it.
#[derive(Debug)]
pub struct SqliteBackend {
    conn: Connection,
    strict: bool,
}

impl SqliteBackend {
    /// Wraps an open connection.
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            strict: false,
        }
    }

    /// Opens an empty in-memory database.
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self, SqliteBackendError> {
        Ok(Self::new(Connection::open_in_memory()?))
    }

    /// Requires every statement of a batch to affect exactly one row.
    ///
    /// This surfaces full-row matches that hit zero or several identical rows.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// The underlying connection.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Runs `sql` and returns its result as a snapshot.
    ///
    /// Blobs are loaded as lossy UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the query fails.
    pub fn snapshot(&self, sql: &str) -> Result<GridSnapshot, SqliteBackendError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(cell_value))
                    .collect::<rusqlite::Result<Vec<CellValue>>>()
            })?
            .collect::<rusqlite::Result<Vec<Vec<CellValue>>>>()?;
        Ok(GridSnapshot::new(columns, rows)?)
    }

    fn apply(&mut self, statements: &[String]) -> Result<(), SqliteBackendError> {
        let strict = self.strict;
        let tx = self.conn.transaction()?;
        for (statement, sql) in statements.iter().enumerate() {
            let affected = tx.execute(sql, [])?;
            if strict && affected != 1 {
                return Err(SqliteBackendError::RowCountMismatch {
                    statement,
                    affected,
                });
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl MutationBackend for SqliteBackend {
    type Error = SqliteBackendError;

    fn execute_mutations(
        &mut self,
        statements: &[String],
    ) -> impl Future<Output = Result<(), Self::Error>> {
        ready(self.apply(statements))
    }
}

/// Converts a SQLite value into a cell value.
fn cell_value(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Integer(i),
        ValueRef::Real(r) => CellValue::Real(r),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            CellValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
