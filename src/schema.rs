//! Table descriptors and the grid snapshot the pending edits address.
mod dyn_table;
mod grid;
mod simple_table;
mod structure;

pub use dyn_table::DynTable;
pub use grid::GridSnapshot;
pub use simple_table::SimpleTable;
pub use structure::ColumnInfo;
