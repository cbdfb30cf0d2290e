//! Optimizer expression vocabulary.
//!
//! This module provides:
//! - Expression tree representation (literals, column references, calls)
//! - Operator symbols with kind tags and type inference rules
//! - The standard operator table

pub mod expr;
pub mod operator;

pub use expr::{CallExpr, ColumnRef, Expression, Literal};
pub use operator::{
    AggregateSignature, Arity, Comparison, FunctionCategory, OperandChecker,
    OperandTypeInference, Operator, OperatorKind, OperatorRef, ReturnTypeInference, StdOperator,
};
