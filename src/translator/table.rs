//! Bootstrap mapping between native function names, optimizer operators and
//! native tokens. Built once, then only read.

use crate::expression::StdOperator;
use crate::native::{FunctionRegistry, TokenType};
use log::debug;
use std::collections::HashMap;

/// Token emitted for an operator that has a dedicated native syntax node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeToken {
    pub token: TokenType,
    pub text: String,
}

impl NativeToken {
    pub fn new(token: TokenType, text: &str) -> Self {
        Self {
            token,
            text: text.to_string(),
        }
    }
}

/// Immutable operator mapping tables
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    /// Native display name → optimizer operator
    native_to_operator: HashMap<String, StdOperator>,
    /// Optimizer operator → native token
    operator_to_token: HashMap<StdOperator, NativeToken>,
    /// Optimizer operator → native name it was registered under
    operator_to_native: HashMap<StdOperator, String>,
}

impl OperatorTable {
    pub fn builder(registry: &dyn FunctionRegistry) -> OperatorTableBuilder<'_> {
        OperatorTableBuilder {
            registry,
            table: OperatorTable::default(),
        }
    }

    /// The engine's fixed bootstrap list
    pub fn bootstrap(registry: &dyn FunctionRegistry) -> Self {
        use StdOperator::*;
        use TokenType as T;

        Self::builder(registry)
            .register("+", Plus, Some(NativeToken::new(T::Plus, "+")))
            .register("-", Minus, Some(NativeToken::new(T::Minus, "-")))
            .register("*", Multiply, Some(NativeToken::new(T::Star, "*")))
            .register("/", Divide, Some(NativeToken::new(T::Divide, "/")))
            .register("%", Mod, Some(NativeToken::new(T::Mod, "%")))
            .register("and", And, Some(NativeToken::new(T::KwAnd, "and")))
            .register("or", Or, Some(NativeToken::new(T::KwOr, "or")))
            .register("=", Equals, Some(NativeToken::new(T::Equal, "=")))
            .register("<>", NotEquals, Some(NativeToken::new(T::NotEqual, "<>")))
            .register("<", LessThan, Some(NativeToken::new(T::LessThan, "<")))
            .register(
                "<=",
                LessThanOrEqual,
                Some(NativeToken::new(T::LessThanOrEqualTo, "<=")),
            )
            .register(">", GreaterThan, Some(NativeToken::new(T::GreaterThan, ">")))
            .register(
                ">=",
                GreaterThanOrEqual,
                Some(NativeToken::new(T::GreaterThanOrEqualTo, ">=")),
            )
            .register("!", Not, Some(NativeToken::new(T::KwNot, "not")))
            .register("in", In, None)
            .register("isnull", IsNull, None)
            .register("isnotnull", IsNotNull, None)
            .register("count", Count, None)
            .build()
    }

    pub fn operator(&self, display_name: &str) -> Option<StdOperator> {
        self.native_to_operator.get(display_name).copied()
    }

    pub fn token(&self, op: StdOperator) -> Option<&NativeToken> {
        self.operator_to_token.get(&op)
    }

    pub fn native_name(&self, op: StdOperator) -> Option<&str> {
        self.operator_to_native.get(&op).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.native_to_operator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.native_to_operator.is_empty()
    }
}

/// Accumulates registrations before freezing them into an [`OperatorTable`]
pub struct OperatorTableBuilder<'a> {
    registry: &'a dyn FunctionRegistry,
    table: OperatorTable,
}

impl<'a> OperatorTableBuilder<'a> {
    /// Tie `name` to `op` and, when given, `op` to its native token.
    ///
    /// The forward mapping is keyed on the native descriptor's display name so
    /// every alias of the function lands on the same entry. Names unknown to
    /// the function registry keep only their reverse mapping.
    pub fn register(mut self, name: &str, op: StdOperator, token: Option<NativeToken>) -> Self {
        self.table
            .operator_to_native
            .insert(op, name.to_string());

        match self.registry.lookup(name) {
            Some(info) => {
                self.table
                    .native_to_operator
                    .insert(info.display_name, op);
                if let Some(token) = token {
                    self.table.operator_to_token.insert(op, token);
                }
            }
            None => debug!("Native function {} is not registered, skipping {:?}", name, op),
        }
        self
    }

    pub fn build(self) -> OperatorTable {
        self.table
    }
}
