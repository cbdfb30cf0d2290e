//! Cardinality statistics and filter selectivity estimation.

pub mod provider;
pub mod selectivity;

pub use provider::{StatisticsProvider, TableStatistics, NDV_FLOOR};
pub use selectivity::{is_partition_predicate, FilterSelectivityEstimator};
