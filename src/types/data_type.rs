//! Column data types and their families.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Data types known to the engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    String,
    Char(u32),
    Varchar(u32),
    Decimal { precision: u8, scale: u8 },
    Timestamp,
    Date,
    Binary,
    Interval,
    /// Type of an untyped NULL
    Void,
    Array(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
    Struct(Vec<(String, DataType)>),
}

/// Coarse type grouping used when checking operands of synthesized functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Boolean,
    Numeric,
    Character,
    Binary,
    Datetime,
    Interval,
    Any,
}

impl DataType {
    /// The declared family of this type, if it has one
    pub fn family(&self) -> Option<TypeFamily> {
        match self {
            DataType::Boolean => Some(TypeFamily::Boolean),
            DataType::TinyInt
            | DataType::SmallInt
            | DataType::Int
            | DataType::BigInt
            | DataType::Float
            | DataType::Double
            | DataType::Decimal { .. } => Some(TypeFamily::Numeric),
            DataType::String | DataType::Char(_) | DataType::Varchar(_) => {
                Some(TypeFamily::Character)
            }
            DataType::Binary => Some(TypeFamily::Binary),
            DataType::Timestamp | DataType::Date => Some(TypeFamily::Datetime),
            DataType::Interval => Some(TypeFamily::Interval),
            DataType::Void | DataType::Array(_) | DataType::Map(_, _) | DataType::Struct(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.family() == Some(TypeFamily::Numeric)
    }
}

impl TypeFamily {
    /// Check whether a value of `data_type` is acceptable for this family
    pub fn accepts(&self, data_type: &DataType) -> bool {
        match self {
            TypeFamily::Any => true,
            family => data_type.family() == Some(*family) || *data_type == DataType::Void,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "boolean"),
            DataType::TinyInt => write!(f, "tinyint"),
            DataType::SmallInt => write!(f, "smallint"),
            DataType::Int => write!(f, "int"),
            DataType::BigInt => write!(f, "bigint"),
            DataType::Float => write!(f, "float"),
            DataType::Double => write!(f, "double"),
            DataType::String => write!(f, "string"),
            DataType::Char(len) => write!(f, "char({})", len),
            DataType::Varchar(len) => write!(f, "varchar({})", len),
            DataType::Decimal { precision, scale } => {
                write!(f, "decimal({},{})", precision, scale)
            }
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Date => write!(f, "date"),
            DataType::Binary => write!(f, "binary"),
            DataType::Interval => write!(f, "interval"),
            DataType::Void => write!(f, "void"),
            DataType::Array(elem) => write!(f, "array<{}>", elem),
            DataType::Map(key, value) => write!(f, "map<{},{}>", key, value),
            DataType::Struct(fields) => {
                write!(f, "struct<")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", name, ty)?;
                }
                write!(f, ">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families() {
        assert_eq!(DataType::Int.family(), Some(TypeFamily::Numeric));
        assert_eq!(
            DataType::Decimal {
                precision: 10,
                scale: 2
            }
            .family(),
            Some(TypeFamily::Numeric)
        );
        assert_eq!(DataType::Varchar(20).family(), Some(TypeFamily::Character));
        assert_eq!(DataType::Date.family(), Some(TypeFamily::Datetime));
        assert_eq!(DataType::Void.family(), None);
        assert_eq!(DataType::Array(Box::new(DataType::Int)).family(), None);
    }

    #[test]
    fn test_family_accepts() {
        assert!(TypeFamily::Any.accepts(&DataType::Binary));
        assert!(TypeFamily::Numeric.accepts(&DataType::BigInt));
        assert!(TypeFamily::Numeric.accepts(&DataType::Void));
        assert!(!TypeFamily::Numeric.accepts(&DataType::String));
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::Char(3).to_string(), "char(3)");
        assert_eq!(
            DataType::Decimal {
                precision: 12,
                scale: 4
            }
            .to_string(),
            "decimal(12,4)"
        );
        assert_eq!(
            DataType::Map(Box::new(DataType::String), Box::new(DataType::Int)).to_string(),
            "map<string,int>"
        );
    }
}
