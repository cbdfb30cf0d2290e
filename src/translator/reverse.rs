//! Ordered pipeline resolving an optimizer operator back to a native function.

use crate::expression::{Operator, OperatorKind};
use crate::native::FunctionInfo;
use crate::translator::error::{Result, TranslateError};
use crate::translator::symbols::SymbolTranslator;
use crate::types::DataType;
use log::error;

/// One stage of reverse resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseStage {
    /// Native name the operator was registered under at bootstrap
    RegisteredName,
    /// The operator's own name looked up in the function registry
    SymbolName,
    /// Native cast function for the requested result type
    CastTable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Resolved(FunctionInfo),
    Next,
}

impl From<Option<FunctionInfo>> for StageOutcome {
    fn from(info: Option<FunctionInfo>) -> Self {
        info.map_or(StageOutcome::Next, StageOutcome::Resolved)
    }
}

impl ReverseStage {
    pub const ALL: [ReverseStage; 3] = [
        ReverseStage::RegisteredName,
        ReverseStage::SymbolName,
        ReverseStage::CastTable,
    ];

    pub fn run(
        &self,
        translator: &SymbolTranslator,
        op: &Operator,
        result_type: &DataType,
    ) -> Result<StageOutcome> {
        match self {
            ReverseStage::RegisteredName => Ok(op
                .std
                .and_then(|std| translator.table().native_name(std))
                .and_then(|name| translator.registry().lookup(name))
                .into()),
            ReverseStage::SymbolName => Ok(translator.registry().lookup(&op.name).into()),
            ReverseStage::CastTable => {
                if op.kind != OperatorKind::Cast {
                    return Ok(StageOutcome::Next);
                }
                cast_function(translator, result_type).map(StageOutcome::Resolved)
            }
        }
    }
}

/// Native cast function producing `target`.
///
/// Every scalar type of the engine has an entry; hitting a type without one
/// means the type system and this table have drifted apart.
pub fn cast_function(translator: &SymbolTranslator, target: &DataType) -> Result<FunctionInfo> {
    let (name, parameterized) = match target {
        DataType::TinyInt => ("tinyint", false),
        DataType::Char(_) => ("char", true),
        DataType::Varchar(_) => ("varchar", true),
        DataType::String => ("string", false),
        DataType::Boolean => ("boolean", false),
        DataType::SmallInt => ("smallint", false),
        DataType::Int => ("int", false),
        DataType::BigInt => ("bigint", false),
        DataType::Float => ("float", false),
        DataType::Double => ("double", false),
        DataType::Timestamp => ("timestamp", false),
        DataType::Date => ("datetime", false),
        DataType::Decimal { .. } => ("decimal", true),
        DataType::Binary => ("binary", false),
        DataType::Interval
        | DataType::Void
        | DataType::Array(_)
        | DataType::Map(_, _)
        | DataType::Struct(_) => {
            error!("No native cast function for type {}", target);
            return Err(TranslateError::CastTableGap(target.clone()));
        }
    };

    let info = translator
        .registry()
        .lookup(name)
        .ok_or_else(|| TranslateError::MissingCastFunction(name.to_string()))?;

    if !parameterized {
        return Ok(info);
    }
    info.with_type_parameter(target.clone())
        .ok_or_else(|| TranslateError::NotSettable(name.to_string()))
}
