#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod builders;
pub mod commit;
pub(crate) mod encoding;
pub mod errors;
pub mod schema;
#[cfg(feature = "testing")]
pub mod testing;

// Re-export main types
pub use builders::{
    CellChange, CellChanges, ChangeKind, ChangeSet, ChangeSummary, DeleteOutcome, RowChange,
};
pub use commit::{CommitBatch, CommitCoordinator, CommitState, MutationBackend, split_statements};
pub use encoding::{CellValue, Coercion, SqlLiteral};
pub use schema::{ColumnInfo, DynTable, GridSnapshot, SimpleTable};

// Re-export errors
pub use errors::{Error, ErrorKind};
