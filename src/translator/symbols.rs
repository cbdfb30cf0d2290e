//! Operator symbol translation between native names and optimizer operators.

use crate::expression::{Operator, OperatorKind, OperatorRef, StdOperator};
use crate::native::{
    AstNode, AstNodeFactory, BuiltinFunctionRegistry, FunctionInfo, FunctionRegistry,
    NativeHandle, NodeFactory, TokenType,
};
use crate::translator::error::{Result, TranslateError};
use crate::translator::reverse::{ReverseStage, StageOutcome};
use crate::translator::table::OperatorTable;
use crate::types::DataType;
use log::{trace, warn};
use std::sync::{Arc, OnceLock};

/// Null-safe equality has no optimizer equivalent that join reordering handles
const NULL_SAFE_EQUALS: &str = "<=>";

/// Bidirectional translator between native functions and optimizer operators
pub struct SymbolTranslator {
    table: Arc<OperatorTable>,
    registry: Arc<dyn FunctionRegistry>,
    factory: Arc<dyn NodeFactory>,
}

impl SymbolTranslator {
    /// Bootstrap the operator table against `registry`
    pub fn new(registry: Arc<dyn FunctionRegistry>) -> Self {
        let table = Arc::new(OperatorTable::bootstrap(registry.as_ref()));
        Self::with_parts(table, registry, Arc::new(AstNodeFactory))
    }

    pub fn with_parts(
        table: Arc<OperatorTable>,
        registry: Arc<dyn FunctionRegistry>,
        factory: Arc<dyn NodeFactory>,
    ) -> Self {
        Self {
            table,
            registry,
            factory,
        }
    }

    /// Process-wide translator over the built-in function registry
    pub fn global() -> &'static SymbolTranslator {
        static GLOBAL: OnceLock<SymbolTranslator> = OnceLock::new();
        GLOBAL.get_or_init(|| SymbolTranslator::new(Arc::new(BuiltinFunctionRegistry::with_builtins())))
    }

    pub fn table(&self) -> &OperatorTable {
        &self.table
    }

    pub fn registry(&self) -> &dyn FunctionRegistry {
        self.registry.as_ref()
    }

    pub fn factory(&self) -> &dyn NodeFactory {
        self.factory.as_ref()
    }

    /// Resolve a native function application to an optimizer operator.
    ///
    /// `hint` is the native descriptor of the function when the caller has
    /// it; unary negation and identity are recognized from it directly.
    /// Unknown names yield a user-defined operator built for exactly this
    /// signature.
    pub fn resolve_operator(
        &self,
        native_name: &str,
        hint: Option<&FunctionInfo>,
        arg_types: &[DataType],
        ret_type: &DataType,
    ) -> Result<OperatorRef> {
        if let Some(info) = hint {
            match info.handle {
                NativeHandle::Negative => return Ok(StdOperator::UnaryMinus.operator()),
                NativeHandle::Positive => return Ok(StdOperator::UnaryPlus.operator()),
                _ => {}
            }
        }

        let name = self.resolution_name(native_name, hint)?;
        self.resolve_function(&name, arg_types, ret_type)
    }

    /// Resolve an aggregate function; unknown names yield a user-defined
    /// aggregate exposing its declared parameter and return types
    pub fn resolve_aggregate(
        &self,
        native_name: &str,
        arg_types: &[DataType],
        ret_type: &DataType,
    ) -> Result<OperatorRef> {
        let name = self.resolution_name(native_name, None)?;
        reject_unsupported(&name)?;

        match self.table.operator(&name) {
            Some(std) => Ok(std.operator()),
            None => Ok(Arc::new(Operator::user_defined_aggregate(
                &name, arg_types, ret_type,
            ))),
        }
    }

    /// Resolve by already-normalized native name
    pub fn resolve_function(
        &self,
        name: &str,
        arg_types: &[DataType],
        ret_type: &DataType,
    ) -> Result<OperatorRef> {
        reject_unsupported(name)?;

        match self.table.operator(name) {
            Some(std) => Ok(std.operator()),
            None => {
                trace!("Synthesizing user-defined operator {}", name);
                Ok(Arc::new(Operator::user_defined(name, arg_types, ret_type)))
            }
        }
    }

    /// Case-normalize a native name and map aliases onto their display name
    pub fn canonical_name(&self, native_name: &str) -> String {
        let normalized = self.registry.normalize_name(native_name);
        match self.registry.lookup(&normalized) {
            Some(info) => info.display_name,
            None => normalized,
        }
    }

    fn resolution_name(&self, native_name: &str, hint: Option<&FunctionInfo>) -> Result<String> {
        if !native_name.trim().is_empty() {
            return Ok(self.canonical_name(native_name));
        }
        match hint {
            Some(info) => {
                warn!(
                    "The function text was empty, name from descriptor is {}",
                    info.display_name
                );
                Ok(info.display_name.clone())
            }
            None => Err(TranslateError::MissingFunctionName),
        }
    }

    /// Find the native function behind an optimizer operator.
    ///
    /// Stages run in [`ReverseStage::ALL`] order; the first one that
    /// resolves wins. A cast to a type outside the native cast table is an
    /// error, never `None`.
    pub fn resolve_native(
        &self,
        op: &Operator,
        result_type: &DataType,
    ) -> Result<Option<FunctionInfo>> {
        for stage in ReverseStage::ALL {
            if let StageOutcome::Resolved(info) = stage.run(self, op, result_type)? {
                trace!("Resolved {} to native {} at {:?}", op, info.display_name, stage);
                return Ok(Some(info));
            }
        }
        Ok(None)
    }

    /// Determinism of the native function behind `op`, if it resolves
    pub fn is_deterministic(&self, op: &Operator, result_type: &DataType) -> Result<Option<bool>> {
        Ok(self
            .resolve_native(op, result_type)?
            .map(|info| info.deterministic))
    }

    /// Native name to emit for a generic function application of `op`
    pub fn native_function_name<'a>(&'a self, op: &'a Operator) -> &'a str {
        op.std
            .and_then(|std| self.table.native_name(std))
            .unwrap_or(&op.name)
    }

    /// Rebuild the native syntax node for a call of `op` over already
    /// translated operands.
    ///
    /// Casts produce a bare `TOK_FUNCTION` without a name; the caller
    /// supplies the target type node.
    pub fn rebuild_native_node(&self, op: &Operator, children: Vec<AstNode>) -> AstNode {
        let factory = self.factory.as_ref();

        let mut node = match op.std.and_then(|std| self.table.token(std)) {
            Some(token) => factory.create_token(token.token, &token.text),
            None => match op.kind {
                OperatorKind::Cast => factory.create_token(TokenType::TokFunction, "TOK_FUNCTION"),
                OperatorKind::UnaryMinus => factory.create_token(TokenType::Minus, "-"),
                OperatorKind::UnaryPlus => factory.create_token(TokenType::Plus, "+"),
                OperatorKind::Count if children.is_empty() => {
                    let mut star =
                        factory.create_token(TokenType::TokFunctionStar, "TOK_FUNCTIONSTAR");
                    let name = factory.create_token(TokenType::Identifier, self.native_function_name(op));
                    factory.add_child(&mut star, name);
                    star
                }
                _ => factory.create_function_call(self.native_function_name(op)),
            },
        };

        for child in children {
            factory.add_child(&mut node, child);
        }
        node
    }

    /// Rebuild a flattened associative call (`and[x, y, z]`) as the
    /// right-deep binary chain `and(x, and(y, z))`
    pub fn rebuild_associative_chain(&self, op: &Operator, children: Vec<AstNode>) -> Result<AstNode> {
        let token = op
            .std
            .and_then(|std| self.table.token(std))
            .ok_or_else(|| TranslateError::MissingToken(op.name.clone()))?;
        let factory = self.factory.as_ref();

        let mut remaining = children.into_iter().rev();
        let mut chain = remaining
            .next()
            .ok_or_else(|| TranslateError::EmptyChain(op.name.clone()))?;
        for child in remaining {
            let mut node = factory.create_token(token.token, &token.text);
            factory.add_child(&mut node, child);
            factory.add_child(&mut node, chain);
            chain = node;
        }
        Ok(chain)
    }
}

fn reject_unsupported(name: &str) -> Result<()> {
    if name.trim() == NULL_SAFE_EQUALS {
        warn!("Rejecting {} for cost-based optimization", NULL_SAFE_EQUALS);
        return Err(TranslateError::Unsupported(NULL_SAFE_EQUALS.to_string()));
    }
    Ok(())
}
