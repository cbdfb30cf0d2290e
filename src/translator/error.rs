//! Errors raised while translating between native and optimizer vocabularies.

use crate::types::DataType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// Native operator with no trusted optimizer equivalent
    #[error("{0} is not yet supported for cbo")]
    Unsupported(String),

    /// The native cast table has no entry for a scalar type
    #[error("Unexpected type for cast: {0}")]
    CastTableGap(DataType),

    #[error("Cast function {0} is not registered")]
    MissingCastFunction(String),

    #[error("Function {0} cannot be parameterized by a type")]
    NotSettable(String),

    #[error("Operator {0} has no native token")]
    MissingToken(String),

    #[error("Associative chain for {0} has no operands")]
    EmptyChain(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column index {index} out of bounds for row with {width} fields")]
    ColumnIndexOutOfBounds { index: usize, width: usize },

    #[error("Cannot infer return type of {0}")]
    UnknownReturnType(String),

    #[error("Function {function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Function name is empty and no native descriptor was supplied")]
    MissingFunctionName,
}

impl TranslateError {
    /// True only for the condition the translation driver may catch and
    /// answer with the non-cost-based path. Everything else is a defect or
    /// malformed input and must propagate.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TranslateError::Unsupported(_))
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TranslateError::Unsupported("<=>".to_string()).to_string(),
            "<=> is not yet supported for cbo"
        );
        assert_eq!(
            TranslateError::CastTableGap(DataType::Interval).to_string(),
            "Unexpected type for cast: interval"
        );
        assert_eq!(
            TranslateError::ColumnIndexOutOfBounds { index: 4, width: 2 }.to_string(),
            "Column index 4 out of bounds for row with 2 fields"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(TranslateError::Unsupported("<=>".to_string()).is_recoverable());
        assert!(!TranslateError::CastTableGap(DataType::Void).is_recoverable());
        assert!(!TranslateError::UnknownColumn("x".to_string()).is_recoverable());
    }
}
