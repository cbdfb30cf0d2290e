//! Heuristic selectivity of filter predicates.
//!
//! Estimates are made against the filter's input: its row count sizes OR
//! branches and its statistics supply distinct-value counts. Sub-predicates
//! over partition columns only are skipped, since partition pruning already
//! shrank the scanned row count.

use crate::expression::{CallExpr, Comparison, Expression, OperatorKind};
use crate::planner::{push_past_project, RelNode};
use crate::stats::provider::{StatisticsProvider, NDV_FLOOR};
use log::trace;

/// Selectivity assumed for an OR branch with no estimate of its own
const UNKNOWN_DISJUNCT_SELECTIVITY: f64 = 0.99;

/// Selectivity of any range comparison
const RANGE_SELECTIVITY: f64 = 1.0 / 3.0;

pub struct FilterSelectivityEstimator<'a> {
    child: &'a RelNode,
    child_cardinality: f64,
    stats: &'a dyn StatisticsProvider,
}

impl<'a> FilterSelectivityEstimator<'a> {
    pub fn new(child: &'a RelNode, stats: &'a dyn StatisticsProvider) -> Self {
        let rows = child.row_count(stats);
        let child_cardinality = if rows.is_finite() && rows >= 0.0 {
            rows
        } else {
            trace!("Unusable row count {} for filter input, using 0", rows);
            0.0
        };
        Self {
            child,
            child_cardinality,
            stats,
        }
    }

    pub fn child_cardinality(&self) -> f64 {
        self.child_cardinality
    }

    /// Fraction of input rows expected to satisfy `predicate`, in `(0, 1]`
    pub fn estimate_selectivity(&self, predicate: &Expression) -> f64 {
        self.visit(predicate).unwrap_or(1.0)
    }

    /// `None` for leaves; only calls carry an estimate
    fn visit(&self, expr: &Expression) -> Option<f64> {
        match expr {
            Expression::Literal(_) | Expression::ColumnRef(_) => None,
            Expression::Call(call) => {
                if is_partition_predicate(expr, self.child) {
                    return Some(1.0);
                }
                Some(self.visit_call(call))
            }
        }
    }

    fn visit_call(&self, call: &CallExpr) -> f64 {
        match call.operator.kind {
            OperatorKind::And => self.conjunction_selectivity(call),
            OperatorKind::Or => self.disjunction_selectivity(call),
            OperatorKind::NotEquals => self.not_equality_selectivity(call),
            OperatorKind::Comparison(
                Comparison::LessThan
                | Comparison::LessThanOrEqual
                | Comparison::GreaterThan
                | Comparison::GreaterThanOrEqual,
            ) => RANGE_SELECTIVITY,
            OperatorKind::In => 1.0 / call.operands.len().max(1) as f64,
            OperatorKind::Equals
            | OperatorKind::Not
            | OperatorKind::Cast
            | OperatorKind::UnaryMinus
            | OperatorKind::UnaryPlus
            | OperatorKind::Count
            | OperatorKind::IsNull
            | OperatorKind::IsNotNull
            | OperatorKind::Arithmetic
            | OperatorKind::Other => self.function_selectivity(call),
        }
    }

    /// Product of the conjuncts; conjuncts without an estimate count as 1
    fn conjunction_selectivity(&self, call: &CallExpr) -> f64 {
        call.operands
            .iter()
            .filter_map(|operand| self.visit(operand))
            .product()
    }

    /// Running product of `1 - m_i/n` over disjuncts, `m_i` being the rows
    /// disjunct `i` is expected to keep out of the `n` input rows. Only a
    /// product above 1 would change the result, and it never gets there, so
    /// every disjunction keeps all rows.
    fn disjunction_selectivity(&self, call: &CallExpr) -> f64 {
        let mut none_match = 1.0;
        for operand in &call.operands {
            let selectivity = self
                .visit(operand)
                .unwrap_or(UNKNOWN_DISJUNCT_SELECTIVITY);
            let cardinality = self.child_cardinality * selectivity;
            if cardinality > 1.0 {
                none_match *= 1.0 - cardinality / self.child_cardinality;
            }
        }

        // 1 - none_match would be negative here
        if none_match > 1.0 {
            return 1.0;
        }
        trace!("Disjunction none-match product {}", none_match);
        1.0
    }

    fn not_equality_selectivity(&self, call: &CallExpr) -> f64 {
        let ndv = self.max_ndv(call);
        if ndv > 1.0 {
            (ndv - 1.0) / ndv
        } else {
            1.0
        }
    }

    fn function_selectivity(&self, call: &CallExpr) -> f64 {
        1.0 / self.max_ndv(call)
    }

    /// Largest distinct count among the base columns of the operands
    fn max_ndv(&self, call: &CallExpr) -> f64 {
        let mut max_ndv = NDV_FLOOR;
        for operand in &call.operands {
            let ndv = match operand {
                Expression::ColumnRef(col) => self.distinct_count(col.index),
                _ => operand
                    .input_refs()
                    .into_iter()
                    .map(|index| self.distinct_count(index))
                    .fold(NDV_FLOOR, f64::max),
            };
            max_ndv = max_ndv.max(ndv);
        }
        max_ndv
    }

    /// Provider estimate, with non-finite values treated as missing
    fn distinct_count(&self, column: usize) -> f64 {
        let ndv = self.stats.distinct_count(self.child, column);
        if ndv.is_finite() {
            ndv.max(NDV_FLOOR)
        } else {
            NDV_FLOOR
        }
    }
}

/// True when `expr`, traced down to the scan below `rel`, references
/// partition columns only
pub fn is_partition_predicate(expr: &Expression, rel: &RelNode) -> bool {
    match rel {
        RelNode::Project { input, exprs } => {
            is_partition_predicate(&push_past_project(expr, exprs), input)
        }
        RelNode::Filter { input, .. } => is_partition_predicate(expr, input),
        RelNode::Scan { table } => table.contains_partition_columns_only(&expr.input_refs()),
    }
}
