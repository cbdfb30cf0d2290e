//! Optimizer expressions back to native syntax trees.

use crate::expression::{Expression, OperatorKind};
use crate::native::{AstNode, TokenType};
use crate::planner::Field;
use crate::translator::error::{Result, TranslateError};
use crate::translator::symbols::SymbolTranslator;
use crate::types::{DataType, Value};

/// Emits native syntax for expressions over a fixed input row type
pub struct AstConverter<'a> {
    translator: &'a SymbolTranslator,
    row_type: &'a [Field],
}

impl<'a> AstConverter<'a> {
    pub fn new(translator: &'a SymbolTranslator, row_type: &'a [Field]) -> Self {
        Self {
            translator,
            row_type,
        }
    }

    pub fn convert(&self, expr: &Expression) -> Result<AstNode> {
        match expr {
            Expression::Literal(lit) => Ok(self.literal(&lit.value)),
            Expression::ColumnRef(col) => {
                let field = self.row_type.get(col.index).ok_or(
                    TranslateError::ColumnIndexOutOfBounds {
                        index: col.index,
                        width: self.row_type.len(),
                    },
                )?;
                let factory = self.translator.factory();
                let mut node = factory.create_token(TokenType::TokTableOrCol, "TOK_TABLE_OR_COL");
                factory.add_child(
                    &mut node,
                    factory.create_token(TokenType::Identifier, &field.name),
                );
                Ok(node)
            }
            Expression::Call(call) => {
                let children = call
                    .operands
                    .iter()
                    .map(|operand| self.convert(operand))
                    .collect::<Result<Vec<_>>>()?;
                let op = call.operator.as_ref();

                match op.kind {
                    OperatorKind::And | OperatorKind::Or if children.len() > 2 => {
                        self.translator.rebuild_associative_chain(op, children)
                    }
                    OperatorKind::Cast => {
                        let type_node = self.type_node(&call.return_type)?;
                        let mut node = self.translator.rebuild_native_node(op, children);
                        node.children.insert(0, type_node);
                        Ok(node)
                    }
                    _ => Ok(self.translator.rebuild_native_node(op, children)),
                }
            }
        }
    }

    fn literal(&self, value: &Value) -> AstNode {
        let token = match value {
            Value::Null => TokenType::KwNull,
            Value::Boolean(true) => TokenType::KwTrue,
            Value::Boolean(false) => TokenType::KwFalse,
            Value::Int(_) | Value::Double(_) => TokenType::Number,
            Value::String(_) => TokenType::StringLiteral,
            Value::Decimal(_) => TokenType::DecimalLiteral,
        };
        self.translator
            .factory()
            .create_token(token, &value.to_string())
    }

    /// Type token naming a cast target; parameterized types carry their
    /// parameters as number children
    fn type_node(&self, data_type: &DataType) -> Result<AstNode> {
        let (token, text, params): (TokenType, &str, Vec<u32>) = match data_type {
            DataType::Boolean => (TokenType::TokBoolean, "TOK_BOOLEAN", vec![]),
            DataType::TinyInt => (TokenType::TokTinyInt, "TOK_TINYINT", vec![]),
            DataType::SmallInt => (TokenType::TokSmallInt, "TOK_SMALLINT", vec![]),
            DataType::Int => (TokenType::TokInt, "TOK_INT", vec![]),
            DataType::BigInt => (TokenType::TokBigInt, "TOK_BIGINT", vec![]),
            DataType::Float => (TokenType::TokFloat, "TOK_FLOAT", vec![]),
            DataType::Double => (TokenType::TokDouble, "TOK_DOUBLE", vec![]),
            DataType::String => (TokenType::TokString, "TOK_STRING", vec![]),
            DataType::Char(len) => (TokenType::TokChar, "TOK_CHAR", vec![*len]),
            DataType::Varchar(len) => (TokenType::TokVarchar, "TOK_VARCHAR", vec![*len]),
            DataType::Decimal { precision, scale } => (
                TokenType::TokDecimal,
                "TOK_DECIMAL",
                vec![u32::from(*precision), u32::from(*scale)],
            ),
            DataType::Timestamp => (TokenType::TokTimestamp, "TOK_TIMESTAMP", vec![]),
            DataType::Date => (TokenType::TokDate, "TOK_DATE", vec![]),
            DataType::Binary => (TokenType::TokBinary, "TOK_BINARY", vec![]),
            DataType::Interval
            | DataType::Void
            | DataType::Array(_)
            | DataType::Map(_, _)
            | DataType::Struct(_) => return Err(TranslateError::CastTableGap(data_type.clone())),
        };

        let factory = self.translator.factory();
        let mut node = factory.create_token(token, text);
        for param in params {
            factory.add_child(
                &mut node,
                factory.create_token(TokenType::Number, &param.to_string()),
            );
        }
        Ok(node)
    }
}
