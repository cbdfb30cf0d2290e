//! Translation between the native function vocabulary and optimizer
//! operators.
//!
//! The forward direction turns native function names (and their descriptors)
//! into operator symbols, synthesizing user-defined operators for names the
//! bootstrap table does not know. The reverse direction finds the native
//! function behind an operator and rebuilds native syntax nodes, including
//! the right-deep chains the native side expects for flattened AND/OR.

pub mod convert;
pub mod error;
pub mod reverse;
pub mod symbols;
pub mod table;
pub mod unparse;

pub use convert::ExprConverter;
pub use error::{Result, TranslateError};
pub use reverse::{cast_function, ReverseStage, StageOutcome};
pub use symbols::SymbolTranslator;
pub use table::{NativeToken, OperatorTable, OperatorTableBuilder};
pub use unparse::AstConverter;
