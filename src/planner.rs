//! Logical plan nodes the predicate analysis operates over.
//!
//! The optimizer sees three relational operators: table scans, filters and
//! projections. Scans carry the table metadata, including which columns are
//! partition columns.

pub mod logical;
pub mod table;

pub use logical::{push_past_project, RelNode};
pub use table::{Field, TableMeta};
