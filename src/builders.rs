//! Pending changeset tracking and SQL statement generation.

mod change;
mod operation;
mod sql_output;

pub use change::{ChangeSet, ChangeSummary, DeleteOutcome};
pub use operation::{CellChange, CellChanges, ChangeKind, RowChange};
