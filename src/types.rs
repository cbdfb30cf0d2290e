//! Type system shared by native and optimizer expressions.
//!
//! This module provides:
//! - **DataType**: scalar and complex column types
//! - **TypeFamily**: coarse grouping used by operand type checkers
//! - **Value**: literal constants carried by expression trees

pub mod data_type;
pub mod value;

pub use data_type::{DataType, TypeFamily};
pub use value::Value;
