//! Operator symbols of the optimizer's expression vocabulary.

use crate::types::{DataType, TypeFamily};
use std::fmt;
use std::sync::Arc;

/// Shared handle to an operator symbol
pub type OperatorRef = Arc<Operator>;

/// Range comparison flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

/// Kind tag of an operator. Fixed when the operator is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    And,
    Or,
    Not,
    Equals,
    NotEquals,
    Comparison(Comparison),
    In,
    Cast,
    UnaryMinus,
    UnaryPlus,
    Count,
    IsNull,
    IsNotNull,
    Arithmetic,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCategory {
    System,
    UserDefined,
}

/// Number of operands accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    pub fn allows(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

/// Rule deriving a call's result type from its operand types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnTypeInference {
    Explicit(DataType),
    Boolean,
    BigInt,
    FirstOperand,
    LeastRestrictiveNumeric,
}

/// Rule supplying the types of operands whose type is unknown
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperandTypeInference {
    None,
    Explicit(Vec<DataType>),
}

/// Validation applied to operand types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperandChecker {
    Any,
    Families(Vec<TypeFamily>),
}

/// Declared signature of a synthesized aggregate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateSignature {
    pub param_types: Vec<DataType>,
    pub return_type: DataType,
}

/// Operators of the optimizer's standard operator table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StdOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Mod,
    And,
    Or,
    Not,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    Cast,
    UnaryMinus,
    UnaryPlus,
    Count,
    IsNull,
    IsNotNull,
}

/// An operator symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operator {
    pub name: String,
    pub kind: OperatorKind,
    pub arity: Arity,
    pub category: FunctionCategory,
    pub return_type: ReturnTypeInference,
    pub operand_types: OperandTypeInference,
    pub operand_checker: OperandChecker,
    /// Set when this symbol is an entry of the standard operator table
    pub std: Option<StdOperator>,
    pub aggregate: Option<AggregateSignature>,
}

impl StdOperator {
    pub fn name(&self) -> &'static str {
        match self {
            StdOperator::Plus => "+",
            StdOperator::Minus => "-",
            StdOperator::Multiply => "*",
            StdOperator::Divide => "/",
            StdOperator::Mod => "MOD",
            StdOperator::And => "AND",
            StdOperator::Or => "OR",
            StdOperator::Not => "NOT",
            StdOperator::Equals => "=",
            StdOperator::NotEquals => "<>",
            StdOperator::LessThan => "<",
            StdOperator::LessThanOrEqual => "<=",
            StdOperator::GreaterThan => ">",
            StdOperator::GreaterThanOrEqual => ">=",
            StdOperator::In => "IN",
            StdOperator::Cast => "CAST",
            StdOperator::UnaryMinus => "-",
            StdOperator::UnaryPlus => "+",
            StdOperator::Count => "COUNT",
            StdOperator::IsNull => "IS NULL",
            StdOperator::IsNotNull => "IS NOT NULL",
        }
    }

    pub fn kind(&self) -> OperatorKind {
        match self {
            StdOperator::Plus
            | StdOperator::Minus
            | StdOperator::Multiply
            | StdOperator::Divide
            | StdOperator::Mod => OperatorKind::Arithmetic,
            StdOperator::And => OperatorKind::And,
            StdOperator::Or => OperatorKind::Or,
            StdOperator::Not => OperatorKind::Not,
            StdOperator::Equals => OperatorKind::Equals,
            StdOperator::NotEquals => OperatorKind::NotEquals,
            StdOperator::LessThan => OperatorKind::Comparison(Comparison::LessThan),
            StdOperator::LessThanOrEqual => OperatorKind::Comparison(Comparison::LessThanOrEqual),
            StdOperator::GreaterThan => OperatorKind::Comparison(Comparison::GreaterThan),
            StdOperator::GreaterThanOrEqual => {
                OperatorKind::Comparison(Comparison::GreaterThanOrEqual)
            }
            StdOperator::In => OperatorKind::In,
            StdOperator::Cast => OperatorKind::Cast,
            StdOperator::UnaryMinus => OperatorKind::UnaryMinus,
            StdOperator::UnaryPlus => OperatorKind::UnaryPlus,
            StdOperator::Count => OperatorKind::Count,
            StdOperator::IsNull => OperatorKind::IsNull,
            StdOperator::IsNotNull => OperatorKind::IsNotNull,
        }
    }

    /// Build the symbol for this standard operator
    pub fn operator(self) -> OperatorRef {
        let (arity, return_type) = match self {
            StdOperator::Plus
            | StdOperator::Minus
            | StdOperator::Multiply
            | StdOperator::Divide
            | StdOperator::Mod => (Arity::exactly(2), ReturnTypeInference::LeastRestrictiveNumeric),
            StdOperator::And | StdOperator::Or | StdOperator::In => {
                (Arity::at_least(2), ReturnTypeInference::Boolean)
            }
            StdOperator::Equals
            | StdOperator::NotEquals
            | StdOperator::LessThan
            | StdOperator::LessThanOrEqual
            | StdOperator::GreaterThan
            | StdOperator::GreaterThanOrEqual => (Arity::exactly(2), ReturnTypeInference::Boolean),
            StdOperator::Not | StdOperator::IsNull | StdOperator::IsNotNull => {
                (Arity::exactly(1), ReturnTypeInference::Boolean)
            }
            StdOperator::Cast | StdOperator::UnaryMinus | StdOperator::UnaryPlus => {
                (Arity::exactly(1), ReturnTypeInference::FirstOperand)
            }
            StdOperator::Count => (Arity::at_least(0), ReturnTypeInference::BigInt),
        };

        Arc::new(Operator {
            name: self.name().to_string(),
            kind: self.kind(),
            arity,
            category: FunctionCategory::System,
            return_type,
            operand_types: OperandTypeInference::None,
            operand_checker: OperandChecker::Any,
            std: Some(self),
            aggregate: None,
        })
    }
}

impl Operator {
    /// Synthesize a user-defined function symbol for one concrete signature
    pub fn user_defined(name: &str, arg_types: &[DataType], ret_type: &DataType) -> Self {
        let families = arg_types
            .iter()
            .map(|ty| ty.family().unwrap_or(TypeFamily::Any))
            .collect();

        Self {
            name: name.to_string(),
            kind: OperatorKind::Other,
            arity: Arity::exactly(arg_types.len()),
            category: FunctionCategory::UserDefined,
            return_type: ReturnTypeInference::Explicit(ret_type.clone()),
            operand_types: OperandTypeInference::Explicit(arg_types.to_vec()),
            operand_checker: OperandChecker::Families(families),
            std: None,
            aggregate: None,
        }
    }

    /// Synthesize a user-defined aggregate symbol; it also exposes its signature
    pub fn user_defined_aggregate(name: &str, arg_types: &[DataType], ret_type: &DataType) -> Self {
        let mut op = Self::user_defined(name, arg_types, ret_type);
        op.aggregate = Some(AggregateSignature {
            param_types: arg_types.to_vec(),
            return_type: ret_type.clone(),
        });
        op
    }

    pub fn is_std(&self, std: StdOperator) -> bool {
        self.std == Some(std)
    }

    pub fn is_aggregate(&self) -> bool {
        self.aggregate.is_some() || self.kind == OperatorKind::Count
    }

    /// Declared parameter types, available on synthesized aggregates
    pub fn parameter_types(&self) -> Option<&[DataType]> {
        self.aggregate.as_ref().map(|sig| sig.param_types.as_slice())
    }

    /// Declared return type, available on synthesized aggregates
    pub fn declared_return_type(&self) -> Option<&DataType> {
        self.aggregate.as_ref().map(|sig| &sig.return_type)
    }

    /// Validate operand count and types
    pub fn check_operands(&self, operand_types: &[DataType]) -> bool {
        if !self.arity.allows(operand_types.len()) {
            return false;
        }
        match &self.operand_checker {
            OperandChecker::Any => true,
            OperandChecker::Families(families) => families.len() == operand_types.len()
                && families
                    .iter()
                    .zip(operand_types)
                    .all(|(family, ty)| family.accepts(ty)),
        }
    }

    /// Type of operand `position`, as given by the explicit operand inference
    pub fn inferred_operand_type(&self, position: usize) -> Option<&DataType> {
        match &self.operand_types {
            OperandTypeInference::None => None,
            OperandTypeInference::Explicit(types) => types.get(position),
        }
    }

    /// Derive the result type of a call over the given operand types
    pub fn infer_return_type(&self, operand_types: &[DataType]) -> Option<DataType> {
        match &self.return_type {
            ReturnTypeInference::Explicit(ty) => Some(ty.clone()),
            ReturnTypeInference::Boolean => Some(DataType::Boolean),
            ReturnTypeInference::BigInt => Some(DataType::BigInt),
            ReturnTypeInference::FirstOperand => operand_types.first().cloned(),
            ReturnTypeInference::LeastRestrictiveNumeric => least_restrictive(operand_types),
        }
    }
}

fn numeric_rank(ty: &DataType) -> Option<u8> {
    match ty {
        DataType::TinyInt => Some(0),
        DataType::SmallInt => Some(1),
        DataType::Int => Some(2),
        DataType::BigInt => Some(3),
        DataType::Decimal { .. } => Some(4),
        DataType::Float => Some(5),
        DataType::Double => Some(6),
        _ => None,
    }
}

fn least_restrictive(types: &[DataType]) -> Option<DataType> {
    let mut widest: Option<&DataType> = None;
    for ty in types.iter().filter(|ty| **ty != DataType::Void) {
        let rank = numeric_rank(ty)?;
        match widest {
            Some(current) if numeric_rank(current)? >= rank => {}
            _ => widest = Some(ty),
        }
    }
    widest.cloned()
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_operator_kinds() {
        assert_eq!(StdOperator::And.operator().kind, OperatorKind::And);
        assert_eq!(
            StdOperator::LessThanOrEqual.operator().kind,
            OperatorKind::Comparison(Comparison::LessThanOrEqual)
        );
        assert_eq!(StdOperator::Mod.operator().kind, OperatorKind::Arithmetic);
        assert!(StdOperator::Cast.operator().is_std(StdOperator::Cast));
    }

    #[test]
    fn test_std_operator_equality_is_structural() {
        assert_eq!(StdOperator::Plus.operator(), StdOperator::Plus.operator());
        assert_ne!(
            StdOperator::Plus.operator(),
            StdOperator::UnaryPlus.operator()
        );
    }

    #[test]
    fn test_user_defined_signature() {
        let op = Operator::user_defined(
            "my_udf",
            &[DataType::Int, DataType::Array(Box::new(DataType::Int))],
            &DataType::String,
        );
        assert_eq!(op.kind, OperatorKind::Other);
        assert_eq!(op.category, FunctionCategory::UserDefined);
        assert_eq!(
            op.operand_checker,
            OperandChecker::Families(vec![TypeFamily::Numeric, TypeFamily::Any])
        );
        assert_eq!(op.infer_return_type(&[]), Some(DataType::String));
        assert_eq!(op.inferred_operand_type(0), Some(&DataType::Int));
        assert!(op.check_operands(&[DataType::BigInt, DataType::Boolean]));
        assert!(!op.check_operands(&[DataType::String, DataType::Boolean]));
        assert!(!op.check_operands(&[DataType::Int]));
        assert!(op.parameter_types().is_none());
    }

    #[test]
    fn test_user_defined_aggregate_exposes_signature() {
        let op = Operator::user_defined_aggregate("my_sum", &[DataType::Double], &DataType::Double);
        assert!(op.is_aggregate());
        assert_eq!(op.parameter_types(), Some(&[DataType::Double][..]));
        assert_eq!(op.declared_return_type(), Some(&DataType::Double));
    }

    #[test]
    fn test_least_restrictive_numeric() {
        let plus = StdOperator::Plus.operator();
        assert_eq!(
            plus.infer_return_type(&[DataType::Int, DataType::Double]),
            Some(DataType::Double)
        );
        assert_eq!(
            plus.infer_return_type(&[DataType::SmallInt, DataType::Void]),
            Some(DataType::SmallInt)
        );
        assert_eq!(
            plus.infer_return_type(&[DataType::Int, DataType::String]),
            None
        );
    }

    #[test]
    fn test_arity() {
        assert!(Arity::exactly(2).allows(2));
        assert!(!Arity::exactly(2).allows(3));
        assert!(Arity::at_least(2).allows(5));
        assert!(StdOperator::Count.operator().arity.allows(0));
    }
}
