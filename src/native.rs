//! Boundary with the native (pre-optimizer) query compiler.
//!
//! The optimizer never owns these structures; it consumes native function
//! descriptors and expression trees, and hands native syntax nodes back:
//!
//! - **FunctionRegistry**: name → [`FunctionInfo`] lookup
//! - **NativeExpr**: expressions as produced by semantic analysis
//! - **AstNode / NodeFactory**: syntax nodes rebuilt from optimizer expressions

pub mod ast;
pub mod expr;
pub mod function;

pub use ast::{AstNode, AstNodeFactory, NodeFactory, TokenType};
pub use expr::NativeExpr;
pub use function::{BuiltinFunctionRegistry, FunctionInfo, FunctionRegistry, NativeHandle};
