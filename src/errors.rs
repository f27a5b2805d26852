//! Submodule defining the errors used across the crate.

use alloc::string::String;

/// Errors that can occur while tracking, synthesizing or committing edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The provided row index is out of bounds for the snapshot.
    #[error("Row index {0} out of bounds for snapshot with {1} rows")]
    RowIndexOutOfBounds(usize, usize),
    /// The provided column index is out of bounds for the number of columns in the table.
    #[error("Column index {0} out of bounds for table with {1} columns")]
    ColumnIndexOutOfBounds(usize, usize),
    /// A row or table descriptor does not have the expected number of columns.
    #[error("Expected {1} columns, found {0}")]
    ColumnCountMismatch(usize, usize),
    /// A new row was inserted at an index which already holds a pending change.
    #[error("Row {0} already has a pending change")]
    RowAlreadyTracked(usize),
    /// A commit was requested while another one is still awaiting the backend.
    #[error("A commit is already in progress")]
    CommitInProgress,
    /// A commit result was reported while no commit was in flight.
    #[error("No commit is in progress")]
    NoCommitInProgress,
    /// A batch was returned to a coordinator that does not have it in flight.
    #[error("The batch does not belong to the commit in progress")]
    ForeignBatch,
    /// A commit was requested without any statement to send.
    #[error("Nothing to commit")]
    EmptyCommit,
    /// The backend rejected the batch. The message is the backend's text, verbatim.
    #[error("{0}")]
    CommitFailed(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed an index or row that does not match the snapshot.
    InvalidArgument,
    /// The operation is not allowed in the coordinator's current state.
    InvalidState,
    /// The backend rejected a commit batch.
    CommitFailed,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RowIndexOutOfBounds(..)
            | Error::ColumnIndexOutOfBounds(..)
            | Error::ColumnCountMismatch(..)
            | Error::RowAlreadyTracked(_)
            | Error::EmptyCommit => ErrorKind::InvalidArgument,
            Error::CommitInProgress | Error::NoCommitInProgress | Error::ForeignBatch => {
                ErrorKind::InvalidState
            }
            Error::CommitFailed(_) => ErrorKind::CommitFailed,
        }
    }

    /// Whether retrying the same batch may succeed.
    ///
    /// Only backend rejections are retryable: the changeset is preserved and the
    /// operator can correct the statements and commit again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::CommitFailed(_))
    }
}
