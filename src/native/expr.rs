//! Native expression trees as handed over by the front end.

use crate::types::{DataType, Value};
use serde::{Deserialize, Serialize};

/// Native, pre-translation expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NativeExpr {
    /// Column of the input row, by name
    Column { name: String },

    /// Constant; untyped constants take the value's natural type
    Constant {
        value: Value,
        #[serde(default)]
        data_type: Option<DataType>,
    },

    /// Function or operator application by native name
    Function {
        name: String,
        #[serde(default)]
        args: Vec<NativeExpr>,
        #[serde(default)]
        return_type: Option<DataType>,
    },
}

impl NativeExpr {
    pub fn column(name: impl Into<String>) -> Self {
        NativeExpr::Column { name: name.into() }
    }

    pub fn constant(value: Value) -> Self {
        NativeExpr::Constant {
            value,
            data_type: None,
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<NativeExpr>) -> Self {
        NativeExpr::Function {
            name: name.into(),
            args,
            return_type: None,
        }
    }

    pub fn typed_function(
        name: impl Into<String>,
        args: Vec<NativeExpr>,
        return_type: DataType,
    ) -> Self {
        NativeExpr::Function {
            name: name.into(),
            args,
            return_type: Some(return_type),
        }
    }
}
