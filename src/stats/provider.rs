//! Distinct-value statistics.

use crate::expression::Expression;
use crate::planner::RelNode;
use log::trace;
use std::collections::HashMap;

/// Smallest meaningful distinct-value estimate
pub const NDV_FLOOR: f64 = 1.0;

/// Source of distinct-value estimates for columns at a point in a plan.
///
/// Unknown columns report [`NDV_FLOOR`], never an error.
pub trait StatisticsProvider: Send + Sync {
    fn distinct_count(&self, node: &RelNode, column: usize) -> f64;
}

/// Per-table, per-column distinct-value counts collected ahead of planning
#[derive(Debug, Clone, Default)]
pub struct TableStatistics {
    ndv: HashMap<String, HashMap<String, f64>>,
}

impl TableStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ndv(mut self, table: &str, column: &str, ndv: f64) -> Self {
        self.set_ndv(table, column, ndv);
        self
    }

    pub fn set_ndv(&mut self, table: &str, column: &str, ndv: f64) {
        self.ndv
            .entry(table.to_lowercase())
            .or_default()
            .insert(column.to_lowercase(), ndv);
    }

    fn column_ndv(&self, table: &str, column: &str) -> Option<f64> {
        self.ndv
            .get(&table.to_lowercase())?
            .get(&column.to_lowercase())
            .copied()
    }
}

impl StatisticsProvider for TableStatistics {
    fn distinct_count(&self, node: &RelNode, column: usize) -> f64 {
        let ndv = match node {
            RelNode::Scan { table } => table
                .field(column)
                .and_then(|field| self.column_ndv(&table.name, &field.name)),
            RelNode::Filter { input, .. } => Some(self.distinct_count(input, column)),
            RelNode::Project { input, exprs } => match exprs.get(column) {
                Some((Expression::ColumnRef(col), _)) => Some(self.distinct_count(input, col.index)),
                _ => None,
            },
        };

        match ndv {
            Some(ndv) if ndv.is_finite() => ndv.max(NDV_FLOOR),
            _ => {
                trace!("No distinct count for column {}, using floor", column);
                NDV_FLOOR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{Field, TableMeta};
    use crate::types::{DataType, Value};

    fn scan() -> std::sync::Arc<RelNode> {
        RelNode::scan(
            TableMeta::new(
                "Orders",
                vec![
                    Field::new("id", DataType::BigInt),
                    Field::new("status", DataType::String),
                ],
            )
            .with_partition_columns(vec![Field::new("ds", DataType::String)])
            .with_row_count(10_000.0),
        )
    }

    #[test]
    fn test_scan_lookup_and_floor() {
        let stats = TableStatistics::new()
            .with_ndv("orders", "STATUS", 4.0)
            .with_ndv("orders", "ds", 0.0);
        let scan = scan();

        assert_eq!(stats.distinct_count(&scan, 1), 4.0);
        assert_eq!(stats.distinct_count(&scan, 2), NDV_FLOOR);
        assert_eq!(stats.distinct_count(&scan, 0), NDV_FLOOR);
        assert_eq!(stats.distinct_count(&scan, 9), NDV_FLOOR);
    }

    #[test]
    fn test_non_finite_counts_are_missing() {
        let scan = scan();
        for ndv in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let stats = TableStatistics::new().with_ndv("orders", "status", ndv);
            assert_eq!(stats.distinct_count(&scan, 1), NDV_FLOOR);
        }
    }

    #[test]
    fn test_traces_through_filter_and_project() {
        let stats = TableStatistics::new().with_ndv("orders", "status", 4.0);
        let filter = RelNode::filter(
            scan(),
            Expression::eq(
                Expression::column(0, DataType::BigInt),
                Expression::literal(Value::Int(1)),
            ),
        );
        let project = RelNode::project(
            filter.clone(),
            vec![
                (Expression::column(1, DataType::String), "status".to_string()),
                (Expression::literal(Value::Int(1)), "one".to_string()),
            ],
        );

        assert_eq!(stats.distinct_count(&filter, 1), 4.0);
        assert_eq!(stats.distinct_count(&project, 0), 4.0);
        assert_eq!(stats.distinct_count(&project, 1), NDV_FLOOR);
    }
}
