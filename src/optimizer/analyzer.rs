//! Translation driver for filter predicates.
//!
//! This is the single place where an unsupported native operator is caught
//! and turned into a fallback to the non-cost-based path. Every other
//! translation error propagates.

use crate::expression::Expression;
use crate::native::{AstNode, NativeExpr};
use crate::optimizer::config::OptimizerConfig;
use crate::planner::RelNode;
use crate::pruner::{PartitionPruner, PartitionSplit};
use crate::stats::{FilterSelectivityEstimator, StatisticsProvider};
use crate::translator::{AstConverter, ExprConverter, Result, SymbolTranslator};
use log::{debug, info, warn};

/// Outcome of translating one filter
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    Cbo(FilterAnalysis),
    /// Cost-based analysis was abandoned for this filter
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterAnalysis {
    pub predicate: Expression,
    pub pruning: Option<Expression>,
    pub residual: Option<Expression>,
    /// Selectivity of the residual against the filter input
    pub selectivity: f64,
    pub estimated_rows: f64,
    pub pruning_ast: Option<AstNode>,
    pub residual_ast: Option<AstNode>,
}

pub struct FilterAnalyzer<'a> {
    translator: &'a SymbolTranslator,
    stats: &'a dyn StatisticsProvider,
    config: OptimizerConfig,
}

impl<'a> FilterAnalyzer<'a> {
    pub fn new(
        translator: &'a SymbolTranslator,
        stats: &'a dyn StatisticsProvider,
        config: OptimizerConfig,
    ) -> Self {
        Self {
            translator,
            stats,
            config,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Analyze a native predicate filtering `input`
    pub fn analyze(&self, input: &RelNode, predicate: &NativeExpr) -> Result<Translation> {
        if !self.config.cbo_enabled {
            return Ok(Translation::Fallback {
                reason: "cost-based optimization is disabled".to_string(),
            });
        }

        let row_type = input.row_type();
        let predicate = match ExprConverter::new(self.translator, &row_type).convert(predicate) {
            Ok(predicate) => predicate,
            Err(e) if e.is_recoverable() => {
                warn!("Falling back to non-cost-based plan: {}", e);
                return Ok(Translation::Fallback {
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let split = match input.table() {
            Some(table) if self.config.partition_pruning && table.is_partitioned() => {
                PartitionPruner::new(self.translator).extract_partition_predicates(&predicate, table)?
            }
            _ => PartitionSplit::unsplit(&predicate),
        };

        let estimator = FilterSelectivityEstimator::new(input, self.stats);
        let selectivity = split
            .residual
            .as_ref()
            .map_or(1.0, |residual| estimator.estimate_selectivity(residual));
        let estimated_rows = estimator.child_cardinality() * selectivity;
        debug!(
            "Filter {} keeps {:.4} of {} rows",
            predicate,
            selectivity,
            estimator.child_cardinality()
        );

        let unparser = AstConverter::new(self.translator, &row_type);
        let pruning_ast = split
            .pruning
            .as_ref()
            .map(|e| unparser.convert(e))
            .transpose()?;
        let residual_ast = split
            .residual
            .as_ref()
            .map(|e| unparser.convert(e))
            .transpose()?;

        if pruning_ast.is_some() {
            info!("Partition pruning predicate found for {}", predicate);
        }

        Ok(Translation::Cbo(FilterAnalysis {
            predicate,
            pruning: split.pruning,
            residual: split.residual,
            selectivity,
            estimated_rows,
            pruning_ast,
            residual_ast,
        }))
    }
}
