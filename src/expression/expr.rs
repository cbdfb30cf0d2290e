//! Expression tree definitions.

use crate::expression::operator::{OperatorKind, OperatorRef, StdOperator};
use crate::types::{DataType, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Reference to a field of the input row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Field index in the input row type (0-based)
    pub index: usize,
    pub data_type: DataType,
}

/// Typed literal constant
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub data_type: DataType,
}

/// Operator applied to an ordered list of operands
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub operator: OperatorRef,
    pub operands: Vec<Expression>,
    pub return_type: DataType,
}

/// Immutable expression tree node. Cloning shares call subtrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    ColumnRef(ColumnRef),
    Call(Arc<CallExpr>),
}

impl Literal {
    pub fn new(value: Value, data_type: DataType) -> Self {
        Self { value, data_type }
    }
}

impl ColumnRef {
    pub fn new(index: usize, data_type: DataType) -> Self {
        Self { index, data_type }
    }
}

impl Expression {
    /// Create a literal expression typed by the value's natural type
    pub fn literal(value: Value) -> Self {
        let data_type = value.data_type().unwrap_or(DataType::Void);
        Expression::Literal(Literal::new(value, data_type))
    }

    pub fn typed_literal(value: Value, data_type: DataType) -> Self {
        Expression::Literal(Literal::new(value, data_type))
    }

    pub fn column(index: usize, data_type: DataType) -> Self {
        Expression::ColumnRef(ColumnRef::new(index, data_type))
    }

    pub fn call(operator: OperatorRef, operands: Vec<Expression>, return_type: DataType) -> Self {
        Expression::Call(Arc::new(CallExpr {
            operator,
            operands,
            return_type,
        }))
    }

    /// Create a call to a standard operator, inferring its result type
    pub fn std_call(op: StdOperator, operands: Vec<Expression>) -> Self {
        let operator = op.operator();
        let operand_types: Vec<DataType> = operands.iter().map(|e| e.data_type().clone()).collect();
        let return_type = operator
            .infer_return_type(&operand_types)
            .unwrap_or(DataType::Void);
        Self::call(operator, operands, return_type)
    }

    pub fn and(operands: Vec<Expression>) -> Self {
        Self::std_call(StdOperator::And, operands)
    }

    pub fn or(operands: Vec<Expression>) -> Self {
        Self::std_call(StdOperator::Or, operands)
    }

    pub fn not_expr(operand: Expression) -> Self {
        Self::std_call(StdOperator::Not, vec![operand])
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::std_call(StdOperator::Equals, vec![left, right])
    }

    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::std_call(StdOperator::NotEquals, vec![left, right])
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::std_call(StdOperator::LessThan, vec![left, right])
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::std_call(StdOperator::LessThanOrEqual, vec![left, right])
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::std_call(StdOperator::GreaterThan, vec![left, right])
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::std_call(StdOperator::GreaterThanOrEqual, vec![left, right])
    }

    /// `expr IN (list...)`; the tested expression is the first operand
    pub fn in_list(expr: Expression, list: Vec<Expression>) -> Self {
        let mut operands = Vec::with_capacity(list.len() + 1);
        operands.push(expr);
        operands.extend(list);
        Self::std_call(StdOperator::In, operands)
    }

    pub fn cast(operand: Expression, target: DataType) -> Self {
        Self::call(StdOperator::Cast.operator(), vec![operand], target)
    }

    /// AND of the given conjuncts: `None` when empty, the conjunct itself when single
    pub fn conjunction(mut conjuncts: Vec<Expression>) -> Option<Self> {
        match conjuncts.len() {
            0 => None,
            1 => conjuncts.pop(),
            _ => Some(Self::and(conjuncts)),
        }
    }

    pub fn data_type(&self) -> &DataType {
        match self {
            Expression::Literal(lit) => &lit.data_type,
            Expression::ColumnRef(col) => &col.data_type,
            Expression::Call(call) => &call.return_type,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match self {
            Expression::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn is_std(&self, op: StdOperator) -> bool {
        self.as_call().map_or(false, |call| call.operator.is_std(op))
    }

    pub fn kind(&self) -> Option<OperatorKind> {
        self.as_call().map(|call| call.operator.kind)
    }

    /// Top-level AND conjuncts; a non-AND expression is its own single conjunct
    pub fn conjuncts(&self) -> Vec<Expression> {
        let mut out = Vec::new();
        self.collect_conjuncts(&mut out);
        out
    }

    fn collect_conjuncts(&self, out: &mut Vec<Expression>) {
        match self.as_call() {
            Some(call) if call.operator.kind == OperatorKind::And => {
                for operand in &call.operands {
                    operand.collect_conjuncts(out);
                }
            }
            _ => out.push(self.clone()),
        }
    }

    /// Indices of all input fields referenced anywhere in the tree
    pub fn input_refs(&self) -> BTreeSet<usize> {
        let mut refs = BTreeSet::new();
        self.collect_input_refs(&mut refs);
        refs
    }

    fn collect_input_refs(&self, refs: &mut BTreeSet<usize>) {
        match self {
            Expression::Literal(_) => {}
            Expression::ColumnRef(col) => {
                refs.insert(col.index);
            }
            Expression::Call(call) => {
                for operand in &call.operands {
                    operand.collect_input_refs(refs);
                }
            }
        }
    }

    /// Rebuild the tree with every column reference replaced by `f(column)`
    pub fn substitute_columns<F>(&self, f: &F) -> Expression
    where
        F: Fn(&ColumnRef) -> Expression,
    {
        match self {
            Expression::Literal(_) => self.clone(),
            Expression::ColumnRef(col) => f(col),
            Expression::Call(call) => Expression::call(
                call.operator.clone(),
                call.operands
                    .iter()
                    .map(|operand| operand.substitute_columns(f))
                    .collect(),
                call.return_type.clone(),
            ),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "{}", lit.value),
            Expression::ColumnRef(col) => write!(f, "${}", col.index),
            Expression::Call(call) => {
                write!(f, "{}(", call.operator.name)?;
                for (i, operand) in call.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(index: usize) -> Expression {
        Expression::column(index, DataType::Int)
    }

    fn int(v: i64) -> Expression {
        Expression::literal(Value::Int(v))
    }

    #[test]
    fn test_std_call_infers_type() {
        let cmp = Expression::eq(col(0), int(1));
        assert_eq!(cmp.data_type(), &DataType::Boolean);
        assert_eq!(cmp.kind(), Some(OperatorKind::Equals));

        let sum = Expression::std_call(StdOperator::Plus, vec![col(0), int(1)]);
        assert_eq!(sum.data_type(), &DataType::BigInt);

        let cast = Expression::cast(col(0), DataType::Varchar(10));
        assert_eq!(cast.data_type(), &DataType::Varchar(10));
    }

    #[test]
    fn test_structural_equality() {
        let a = Expression::eq(col(0), int(1));
        let b = Expression::eq(col(0), int(1));
        let c = Expression::eq(col(0), int(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_conjuncts_flatten_nested_and() {
        let p1 = Expression::eq(col(0), int(1));
        let p2 = Expression::eq(col(1), int(2));
        let p3 = Expression::gt(col(2), int(3));
        let nested = Expression::and(vec![p1.clone(), Expression::and(vec![p2.clone(), p3.clone()])]);

        assert_eq!(nested.conjuncts(), vec![p1.clone(), p2, p3]);
        assert_eq!(p1.conjuncts(), vec![p1]);
    }

    #[test]
    fn test_conjunction() {
        assert!(Expression::conjunction(vec![]).is_none());

        let p1 = Expression::eq(col(0), int(1));
        assert_eq!(Expression::conjunction(vec![p1.clone()]), Some(p1.clone()));

        let p2 = Expression::eq(col(1), int(2));
        let both = Expression::conjunction(vec![p1, p2]).unwrap();
        assert!(both.is_std(StdOperator::And));
    }

    #[test]
    fn test_input_refs() {
        let expr = Expression::or(vec![
            Expression::eq(col(3), int(1)),
            Expression::lt(
                Expression::std_call(StdOperator::Plus, vec![col(1), col(3)]),
                int(7),
            ),
        ]);
        assert_eq!(expr.input_refs().into_iter().collect::<Vec<_>>(), vec![1, 3]);
        assert!(int(1).input_refs().is_empty());
    }

    #[test]
    fn test_substitute_columns() {
        let expr = Expression::eq(col(0), int(1));
        let rewritten = expr.substitute_columns(&|c| Expression::column(c.index + 5, DataType::Int));
        assert_eq!(rewritten, Expression::eq(col(5), int(1)));
    }

    #[test]
    fn test_display() {
        let expr = Expression::and(vec![
            Expression::eq(col(0), int(1)),
            Expression::in_list(col(1), vec![int(2), int(3)]),
        ]);
        assert_eq!(expr.to_string(), "AND(=($0, 1), IN($1, 2, 3))");
    }
}
