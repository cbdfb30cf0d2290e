//! Splitting filter predicates into a partition-pruning part and a residual.
//!
//! The pruning part references partition columns only and calls only
//! deterministic functions, so it can be evaluated against partition
//! metadata before any row is read. The residual is whatever the pruning
//! part does not already guarantee. When both are present their conjunction
//! is equivalent to the original predicate.

use crate::expression::{CallExpr, Expression, OperatorKind};
use crate::planner::{Field, TableMeta};
use crate::translator::{Result, SymbolTranslator};
use log::debug;
use std::collections::HashSet;

/// Result of splitting a predicate against a table's partition columns
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSplit {
    pub pruning: Option<Expression>,
    pub residual: Option<Expression>,
}

impl PartitionSplit {
    /// The predicate stays whole; nothing can be pruned
    pub fn unsplit(predicate: &Expression) -> Self {
        Self {
            pruning: None,
            residual: Some(predicate.clone()),
        }
    }
}

pub struct PartitionPruner<'a> {
    translator: &'a SymbolTranslator,
}

impl<'a> PartitionPruner<'a> {
    pub fn new(translator: &'a SymbolTranslator) -> Self {
        Self { translator }
    }

    /// Split `predicate`, written over `table`'s row type.
    ///
    /// Fails only when determinism of a call cannot be decided because the
    /// native cast table has no entry for its type.
    pub fn extract_partition_predicates(
        &self,
        predicate: &Expression,
        table: &TableMeta,
    ) -> Result<PartitionSplit> {
        let row_type = table.row_type();
        let partition_columns = table.partition_column_names();

        let pruning = self.extract_partition_predicate(predicate, &row_type, &partition_columns)?;
        let residual = extract_residual_predicate(predicate, pruning.as_ref());

        debug!(
            "Split predicate on {}: pruning={}, residual={}",
            table.name,
            display_opt(pruning.as_ref()),
            display_opt(residual.as_ref())
        );
        Ok(PartitionSplit { pruning, residual })
    }

    /// The largest part of `expr` that can be evaluated from partition
    /// columns alone, if any
    pub fn extract_partition_predicate(
        &self,
        expr: &Expression,
        row_type: &[Field],
        partition_columns: &HashSet<String>,
    ) -> Result<Option<Expression>> {
        match expr {
            Expression::Literal(_) => Ok(Some(expr.clone())),
            Expression::ColumnRef(col) => Ok(row_type
                .get(col.index)
                .filter(|field| partition_columns.contains(&field.name))
                .map(|_| expr.clone())),
            Expression::Call(call) => {
                if self.is_non_deterministic(call)? {
                    return Ok(None);
                }

                let mut extracted = Vec::with_capacity(call.operands.len());
                let mut pruned = false;
                for operand in &call.operands {
                    match self.extract_partition_predicate(operand, row_type, partition_columns)? {
                        Some(e) => extracted.push(e),
                        None => pruned = true,
                    }
                }

                if call.operator.kind != OperatorKind::And {
                    return Ok(if pruned { None } else { Some(expr.clone()) });
                }
                Ok(rebuild_and(call, extracted))
            }
        }
    }

    fn is_non_deterministic(&self, call: &CallExpr) -> Result<bool> {
        let deterministic = self
            .translator
            .is_deterministic(&call.operator, &call.return_type)?;
        Ok(deterministic == Some(false))
    }
}

/// What remains of `expr` once the conjuncts of `pruning` are guaranteed
pub fn extract_residual_predicate(
    expr: &Expression,
    pruning: Option<&Expression>,
) -> Option<Expression> {
    let pruning = match pruning {
        Some(pruning) => pruning.conjuncts(),
        None => return Some(expr.clone()),
    };
    residual(expr, &pruning)
}

fn residual(expr: &Expression, pruning: &[Expression]) -> Option<Expression> {
    let call = match expr {
        Expression::Call(call) => call,
        _ => return Some(expr.clone()),
    };

    if call.operator.kind != OperatorKind::And {
        return if pruning.contains(expr) {
            None
        } else {
            Some(expr.clone())
        };
    }

    let kept = call
        .operands
        .iter()
        .filter_map(|operand| residual(operand, pruning))
        .collect();
    rebuild_and(call, kept)
}

/// Rebuild an AND over the surviving operands: `None` when none survive,
/// the lone survivor itself when one does
fn rebuild_and(call: &CallExpr, mut operands: Vec<Expression>) -> Option<Expression> {
    match operands.len() {
        0 => None,
        1 => operands.pop(),
        _ => Some(Expression::call(
            call.operator.clone(),
            operands,
            call.return_type.clone(),
        )),
    }
}

fn display_opt(expr: Option<&Expression>) -> String {
    expr.map_or_else(|| "none".to_string(), |e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Operator, StdOperator};
    use crate::native::{BuiltinFunctionRegistry, NativeExpr};
    use crate::translator::{ExprConverter, TranslateError};
    use crate::types::{DataType, Value};
    use std::sync::Arc;

    fn translator() -> SymbolTranslator {
        SymbolTranslator::new(Arc::new(BuiltinFunctionRegistry::with_builtins()))
    }

    fn table() -> TableMeta {
        TableMeta::new(
            "logs",
            vec![
                Field::new("other", DataType::Int),
                Field::new("msg", DataType::String),
            ],
        )
        .with_partition_columns(vec![
            Field::new("part", DataType::Int),
            Field::new("hr", DataType::Int),
        ])
        .with_row_count(100.0)
    }

    fn other() -> Expression {
        Expression::column(0, DataType::Int)
    }

    fn part() -> Expression {
        Expression::column(2, DataType::Int)
    }

    fn hr() -> Expression {
        Expression::column(3, DataType::Int)
    }

    fn int(v: i64) -> Expression {
        Expression::literal(Value::Int(v))
    }

    #[test]
    fn test_conjunction_splits() -> Result<()> {
        let t = translator();
        let pruner = PartitionPruner::new(&t);

        let predicate = Expression::and(vec![
            Expression::eq(part(), int(1)),
            Expression::eq(other(), int(2)),
        ]);
        let split = pruner.extract_partition_predicates(&predicate, &table())?;
        assert_eq!(split.pruning, Some(Expression::eq(part(), int(1))));
        assert_eq!(split.residual, Some(Expression::eq(other(), int(2))));
        Ok(())
    }

    #[test]
    fn test_disjunction_needs_every_operand() -> Result<()> {
        let t = translator();
        let pruner = PartitionPruner::new(&t);

        let abs = Arc::new(Operator::user_defined(
            "abs",
            &[DataType::Int],
            &DataType::Int,
        ));
        let predicate = Expression::or(vec![
            Expression::gt(Expression::call(abs, vec![part()], DataType::Int), int(3)),
            Expression::eq(other(), int(2)),
        ]);
        let split = pruner.extract_partition_predicates(&predicate, &table())?;
        assert_eq!(split, PartitionSplit::unsplit(&predicate));
        Ok(())
    }

    #[test]
    fn test_non_deterministic_call_is_not_pushed() -> Result<()> {
        let t = translator();
        let pruner = PartitionPruner::new(&t);

        let rand = Arc::new(Operator::user_defined("rand", &[], &DataType::Double));
        let predicate = Expression::lt(
            Expression::std_call(
                StdOperator::Plus,
                vec![
                    Expression::call(rand, vec![], DataType::Double),
                    Expression::cast(part(), DataType::Double),
                ],
            ),
            Expression::literal(Value::Double(0.5)),
        );
        let split = pruner.extract_partition_predicates(&predicate, &table())?;
        assert_eq!(split.pruning, None);
        assert_eq!(split.residual, Some(predicate));
        Ok(())
    }

    #[test]
    fn test_whole_predicate_prunable() -> Result<()> {
        let t = translator();
        let pruner = PartitionPruner::new(&t);

        let predicate = Expression::and(vec![
            Expression::eq(part(), int(1)),
            Expression::in_list(hr(), vec![int(1), int(2)]),
        ]);
        let split = pruner.extract_partition_predicates(&predicate, &table())?;
        assert_eq!(split.pruning, Some(predicate));
        assert_eq!(split.residual, None);
        Ok(())
    }

    #[test]
    fn test_nested_and_keeps_extractable_parts() -> Result<()> {
        let t = translator();
        let pruner = PartitionPruner::new(&t);

        let predicate = Expression::and(vec![
            Expression::and(vec![
                Expression::eq(part(), int(1)),
                Expression::eq(other(), int(5)),
            ]),
            Expression::ge(hr(), int(6)),
            Expression::or(vec![
                Expression::eq(part(), int(2)),
                Expression::eq(other(), int(7)),
            ]),
        ]);
        let split = pruner.extract_partition_predicates(&predicate, &table())?;
        assert_eq!(
            split.pruning,
            Some(Expression::and(vec![
                Expression::eq(part(), int(1)),
                Expression::ge(hr(), int(6)),
            ]))
        );
        assert_eq!(
            split.residual,
            Some(Expression::and(vec![
                Expression::eq(other(), int(5)),
                Expression::or(vec![
                    Expression::eq(part(), int(2)),
                    Expression::eq(other(), int(7)),
                ]),
            ]))
        );
        Ok(())
    }

    #[test]
    fn test_no_partition_columns() -> Result<()> {
        let t = translator();
        let pruner = PartitionPruner::new(&t);

        let flat = TableMeta::new("flat", vec![Field::new("other", DataType::Int)]);
        let predicate = Expression::eq(other(), int(1));
        let split = pruner.extract_partition_predicates(&predicate, &flat)?;
        assert_eq!(split, PartitionSplit::unsplit(&predicate));
        Ok(())
    }

    #[test]
    fn test_cast_table_gap_propagates() {
        let t = translator();
        let pruner = PartitionPruner::new(&t);

        let predicate = Expression::eq(Expression::cast(part(), DataType::Interval), int(1));
        assert_eq!(
            pruner.extract_partition_predicates(&predicate, &table()),
            Err(TranslateError::CastTableGap(DataType::Interval))
        );
    }

    #[test]
    fn test_residual_without_pruning_is_original() {
        let predicate = Expression::and(vec![
            Expression::eq(other(), int(1)),
            Expression::eq(other(), int(2)),
        ]);
        assert_eq!(
            extract_residual_predicate(&predicate, None),
            Some(predicate.clone())
        );
    }

    #[test]
    fn test_split_of_converted_native_predicate() -> Result<()> {
        let t = translator();
        let table = table();
        let fields = table.row_type();
        let converter = ExprConverter::new(&t, &fields);

        let native = NativeExpr::function(
            "AND",
            vec![
                NativeExpr::function(
                    "<",
                    vec![
                        NativeExpr::function("rand", vec![]),
                        NativeExpr::constant(Value::Double(0.1)),
                    ],
                ),
                NativeExpr::function(
                    "=",
                    vec![NativeExpr::column("hr"), NativeExpr::constant(Value::Int(3))],
                ),
            ],
        );
        // rand has no declared return type
        assert!(converter.convert(&native).is_err());

        let native = NativeExpr::function(
            "AND",
            vec![
                NativeExpr::function(
                    "<",
                    vec![
                        NativeExpr::typed_function("rand", vec![], DataType::Double),
                        NativeExpr::constant(Value::Double(0.1)),
                    ],
                ),
                NativeExpr::function(
                    "=",
                    vec![NativeExpr::column("hr"), NativeExpr::constant(Value::Int(3))],
                ),
            ],
        );
        let predicate = converter.convert(&native)?;
        let split = PartitionPruner::new(&t).extract_partition_predicates(&predicate, &table)?;

        let conjuncts = predicate.conjuncts();
        assert_eq!(split.pruning.as_ref(), Some(&conjuncts[1]));
        assert_eq!(split.residual.as_ref(), Some(&conjuncts[0]));
        Ok(())
    }
}
