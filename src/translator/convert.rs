//! Native expression trees to optimizer expressions.

use crate::expression::{Expression, OperatorKind, OperatorRef};
use crate::native::{FunctionInfo, NativeExpr, NativeHandle};
use crate::planner::Field;
use crate::translator::error::{Result, TranslateError};
use crate::translator::symbols::SymbolTranslator;
use crate::types::DataType;

/// Converts native expressions over a fixed input row type
pub struct ExprConverter<'a> {
    translator: &'a SymbolTranslator,
    row_type: &'a [Field],
}

impl<'a> ExprConverter<'a> {
    pub fn new(translator: &'a SymbolTranslator, row_type: &'a [Field]) -> Self {
        Self {
            translator,
            row_type,
        }
    }

    pub fn convert(&self, expr: &NativeExpr) -> Result<Expression> {
        match expr {
            NativeExpr::Column { name } => self.convert_column(name),
            NativeExpr::Constant { value, data_type } => {
                let data_type = data_type
                    .clone()
                    .or_else(|| value.data_type())
                    .unwrap_or(DataType::Void);
                Ok(Expression::typed_literal(value.clone(), data_type))
            }
            NativeExpr::Function {
                name,
                args,
                return_type,
            } => self.convert_function(name, args, return_type.as_ref()),
        }
    }

    fn convert_column(&self, name: &str) -> Result<Expression> {
        self.row_type
            .iter()
            .position(|field| field.name.eq_ignore_ascii_case(name))
            .map(|index| Expression::column(index, self.row_type[index].data_type.clone()))
            .ok_or_else(|| TranslateError::UnknownColumn(name.to_string()))
    }

    fn convert_function(
        &self,
        name: &str,
        args: &[NativeExpr],
        return_type: Option<&DataType>,
    ) -> Result<Expression> {
        let operands = args
            .iter()
            .map(|arg| self.convert(arg))
            .collect::<Result<Vec<_>>>()?;
        let hint = self.describe(name);

        if let Some(info) = hint.as_ref().filter(|info| info.cast_target().is_some()) {
            return self.convert_cast(info, operands, return_type);
        }

        let arg_types: Vec<DataType> = operands.iter().map(|e| e.data_type().clone()).collect();
        let declared = return_type.cloned().unwrap_or(DataType::Void);
        let operator = match hint.as_ref().map(|info| &info.handle) {
            Some(NativeHandle::Aggregate(_)) => {
                self.translator
                    .resolve_aggregate(name, &arg_types, &declared)?
            }
            _ => self
                .translator
                .resolve_operator(name, hint.as_ref(), &arg_types, &declared)?,
        };

        if operator.std.is_some() && !operator.arity.allows(operands.len()) {
            return Err(TranslateError::ArgumentCount {
                function: operator.name.clone(),
                expected: operator.arity.min,
                actual: operands.len(),
            });
        }

        let return_type = match return_type {
            Some(ty) => ty.clone(),
            None => operator
                .infer_return_type(&arg_types)
                .filter(|ty| *ty != DataType::Void)
                .ok_or_else(|| TranslateError::UnknownReturnType(name.to_string()))?,
        };

        let operands = flatten(&operator, operands);
        Ok(Expression::call(operator, operands, return_type))
    }

    fn convert_cast(
        &self,
        info: &FunctionInfo,
        mut operands: Vec<Expression>,
        return_type: Option<&DataType>,
    ) -> Result<Expression> {
        if operands.len() != 1 {
            return Err(TranslateError::ArgumentCount {
                function: info.display_name.clone(),
                expected: 1,
                actual: operands.len(),
            });
        }
        let target = return_type
            .or_else(|| info.cast_target())
            .cloned()
            .ok_or_else(|| TranslateError::UnknownReturnType(info.display_name.clone()))?;
        let operand = operands.remove(0);
        Ok(Expression::cast(operand, target))
    }

    fn describe(&self, name: &str) -> Option<FunctionInfo> {
        if name.trim().is_empty() {
            return None;
        }
        self.translator.registry().lookup(name)
    }
}

/// Splice operands of nested AND/OR calls into their same-kind parent
fn flatten(operator: &OperatorRef, operands: Vec<Expression>) -> Vec<Expression> {
    if !matches!(operator.kind, OperatorKind::And | OperatorKind::Or) {
        return operands;
    }
    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        match operand.as_call() {
            Some(call) if call.operator.kind == operator.kind => {
                flat.extend(call.operands.iter().cloned())
            }
            _ => flat.push(operand),
        }
    }
    flat
}
