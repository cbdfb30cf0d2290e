//! Filter analysis for cost-based optimization: translate, split, estimate.

pub mod analyzer;
pub mod config;

pub use analyzer::{FilterAnalysis, FilterAnalyzer, Translation};
pub use config::{ConfigError, OptimizerConfig};
