//! Native syntax tree nodes produced when translating back from the optimizer.

use std::fmt;

/// Token types of native syntax nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Plus,
    Minus,
    Star,
    Divide,
    Mod,
    KwAnd,
    KwOr,
    KwNot,
    KwTrue,
    KwFalse,
    KwNull,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Identifier,
    Number,
    StringLiteral,
    DecimalLiteral,
    TokFunction,
    TokFunctionStar,
    TokTableOrCol,
    TokBoolean,
    TokTinyInt,
    TokSmallInt,
    TokInt,
    TokBigInt,
    TokFloat,
    TokDouble,
    TokString,
    TokChar,
    TokVarchar,
    TokDecimal,
    TokTimestamp,
    TokDate,
    TokBinary,
}

/// A native syntax node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub token: TokenType,
    pub text: String,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(token: TokenType, text: impl Into<String>) -> Self {
        Self {
            token,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Lisp-style rendering, e.g. `(and (= (TOK_TABLE_OR_COL a) 1) true)`
    pub fn to_string_tree(&self) -> String {
        if self.children.is_empty() {
            return self.text.clone();
        }
        let children: Vec<String> = self.children.iter().map(|c| c.to_string_tree()).collect();
        format!("({} {})", self.text, children.join(" "))
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_tree())
    }
}

/// Factory through which the translator builds native nodes
pub trait NodeFactory: Send + Sync {
    fn create_token(&self, token: TokenType, text: &str) -> AstNode;

    fn add_child(&self, parent: &mut AstNode, child: AstNode);

    /// Generic function application shell carrying the function name
    fn create_function_call(&self, name: &str) -> AstNode {
        let mut node = self.create_token(TokenType::TokFunction, "TOK_FUNCTION");
        let identifier = self.create_token(TokenType::Identifier, name);
        self.add_child(&mut node, identifier);
        node
    }
}

/// Factory producing plain [`AstNode`] trees
#[derive(Debug, Clone, Copy, Default)]
pub struct AstNodeFactory;

impl NodeFactory for AstNodeFactory {
    fn create_token(&self, token: TokenType, text: &str) -> AstNode {
        AstNode::new(token, text)
    }

    fn add_child(&self, parent: &mut AstNode, child: AstNode) {
        parent.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_call_shell() {
        let factory = AstNodeFactory;
        let mut call = factory.create_function_call("upper");
        factory.add_child(&mut call, AstNode::new(TokenType::StringLiteral, "'x'"));

        assert_eq!(call.token, TokenType::TokFunction);
        assert_eq!(call.children.len(), 2);
        assert_eq!(call.to_string_tree(), "(TOK_FUNCTION upper 'x')");
    }

    #[test]
    fn test_leaf_rendering() {
        let leaf = AstNode::new(TokenType::Number, "42");
        assert_eq!(leaf.to_string(), "42");
    }
}
