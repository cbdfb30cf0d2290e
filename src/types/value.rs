use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest decimal the engine represents
const MAX_DECIMAL_PRECISION: usize = 38;

/// Literal values carried by expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// Exact numeric kept in its textual form
    Decimal(DecimalText),
}

/// Textual decimal literal, e.g. `"12.50"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimalText {
    pub decimal: String,
}

impl Value {
    pub fn decimal(text: impl Into<String>) -> Self {
        Value::Decimal(DecimalText {
            decimal: text.into(),
        })
    }

    /// Natural data type of this value, `None` for NULL
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int(_) => Some(DataType::BigInt),
            Value::Double(_) => Some(DataType::Double),
            Value::String(_) => Some(DataType::String),
            Value::Decimal(d) => {
                let digits = d.decimal.chars().filter(|c| c.is_ascii_digit()).count();
                let scale = d
                    .decimal
                    .split_once('.')
                    .map(|(_, frac)| frac.len())
                    .unwrap_or(0);
                let precision = digits.clamp(1, MAX_DECIMAL_PRECISION);
                Some(DataType::Decimal {
                    precision: u8::try_from(precision).unwrap_or(u8::MAX),
                    scale: u8::try_from(scale.min(precision)).unwrap_or(u8::MAX),
                })
            }
        }
    }

    /// Check if this value can be stored in a column of the given type
    pub fn is_compatible_with(&self, data_type: &DataType) -> bool {
        match (self, data_type) {
            (Value::Null, _) => true,
            (Value::Boolean(_), DataType::Boolean) => true,
            (Value::Int(_), ty) => ty.is_numeric(),
            (Value::Double(_), DataType::Float | DataType::Double) => true,
            (Value::Decimal(_), DataType::Decimal { .. }) => true,
            (Value::String(_), DataType::String | DataType::Char(_) | DataType::Varchar(_)) => {
                true
            }
            (Value::String(_), DataType::Date | DataType::Timestamp) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Decimal(d) => write!(f, "{}BD", d.decimal),
        }
    }
}
