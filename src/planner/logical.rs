//! Logical relational operators consumed by predicate analysis.
//!
//! Nodes are built once per compilation pass and shared behind `Arc`;
//! rewriting produces new nodes.

use crate::expression::Expression;
use crate::planner::table::{Field, TableMeta};
use crate::stats::{FilterSelectivityEstimator, StatisticsProvider};
use std::collections::HashSet;
use std::sync::Arc;

/// Logical plan node
#[derive(Debug, Clone, PartialEq)]
pub enum RelNode {
    /// Scan a table
    Scan { table: Arc<TableMeta> },

    /// Filter rows based on predicate
    Filter {
        input: Arc<RelNode>,
        predicate: Expression,
    },

    /// Compute named expressions over the input
    Project {
        input: Arc<RelNode>,
        exprs: Vec<(Expression, String)>,
    },
}

impl RelNode {
    pub fn scan(table: TableMeta) -> Arc<Self> {
        Arc::new(RelNode::Scan {
            table: Arc::new(table),
        })
    }

    pub fn filter(input: Arc<RelNode>, predicate: Expression) -> Arc<Self> {
        Arc::new(RelNode::Filter { input, predicate })
    }

    pub fn project(input: Arc<RelNode>, exprs: Vec<(Expression, String)>) -> Arc<Self> {
        Arc::new(RelNode::Project { input, exprs })
    }

    /// Output fields, in order
    pub fn row_type(&self) -> Vec<Field> {
        match self {
            RelNode::Scan { table } => table.row_type(),
            RelNode::Filter { input, .. } => input.row_type(),
            RelNode::Project { exprs, .. } => exprs
                .iter()
                .map(|(expr, name)| Field::new(name.clone(), expr.data_type().clone()))
                .collect(),
        }
    }

    pub fn table(&self) -> Option<&Arc<TableMeta>> {
        match self {
            RelNode::Scan { table } => Some(table),
            _ => None,
        }
    }

    /// Partition column names; only scans have them
    pub fn partition_column_names(&self) -> Option<HashSet<String>> {
        self.table().map(|table| table.partition_column_names())
    }

    /// Nearest scan reachable through filters and projections
    pub fn source_table(&self) -> Option<&Arc<TableMeta>> {
        match self {
            RelNode::Scan { table } => Some(table),
            RelNode::Filter { input, .. } | RelNode::Project { input, .. } => input.source_table(),
        }
    }

    /// Estimated number of output rows
    pub fn row_count(&self, stats: &dyn StatisticsProvider) -> f64 {
        match self {
            RelNode::Scan { table } => table.row_count,
            RelNode::Project { input, .. } => input.row_count(stats),
            RelNode::Filter { input, predicate } => {
                let estimator = FilterSelectivityEstimator::new(input, stats);
                input.row_count(stats) * estimator.estimate_selectivity(predicate)
            }
        }
    }
}

/// Rewrite a predicate over a projection's output into one over its input
pub fn push_past_project(predicate: &Expression, exprs: &[(Expression, String)]) -> Expression {
    predicate.substitute_columns(&|col| match exprs.get(col.index) {
        Some((expr, _)) => expr.clone(),
        None => Expression::ColumnRef(col.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::StdOperator;
    use crate::types::{DataType, Value};

    fn table() -> TableMeta {
        TableMeta::new(
            "t",
            vec![
                Field::new("a", DataType::Int),
                Field::new("b", DataType::Int),
            ],
        )
        .with_partition_columns(vec![Field::new("ds", DataType::String)])
        .with_row_count(500.0)
    }

    #[test]
    fn test_row_types() {
        let scan = RelNode::scan(table());
        assert_eq!(scan.row_type().len(), 3);

        let filter = RelNode::filter(
            scan.clone(),
            Expression::eq(
                Expression::column(0, DataType::Int),
                Expression::literal(Value::Int(1)),
            ),
        );
        assert_eq!(filter.row_type(), scan.row_type());
        assert!(filter.partition_column_names().is_none());
        assert_eq!(filter.source_table().unwrap().name, "t");

        let project = RelNode::project(
            filter,
            vec![(Expression::column(2, DataType::String), "day".to_string())],
        );
        assert_eq!(
            project.row_type(),
            vec![Field::new("day", DataType::String)]
        );
    }

    #[test]
    fn test_push_past_project() {
        let sum = Expression::std_call(
            StdOperator::Plus,
            vec![
                Expression::column(0, DataType::Int),
                Expression::column(1, DataType::Int),
            ],
        );
        let exprs = vec![
            (Expression::column(2, DataType::String), "day".to_string()),
            (sum.clone(), "total".to_string()),
        ];
        let predicate = Expression::gt(
            Expression::column(1, DataType::BigInt),
            Expression::literal(Value::Int(10)),
        );

        let pushed = push_past_project(&predicate, &exprs);
        assert_eq!(
            pushed,
            Expression::gt(sum, Expression::literal(Value::Int(10)))
        );
    }
}
