pub mod expression;
pub mod native;
pub mod optimizer;
pub mod planner;
pub mod pruner;
pub mod stats;
pub mod translator;
pub mod types;
