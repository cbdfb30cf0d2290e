//! rexopt-explain - print the cost-based analysis of filter predicates

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use rexopt::native::NativeExpr;
use rexopt::optimizer::{FilterAnalyzer, OptimizerConfig, Translation};
use rexopt::planner::{Field, RelNode, TableMeta};
use rexopt::stats::TableStatistics;
use rexopt::translator::SymbolTranslator;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Explain partition pruning and selectivity for the filters of a scenario
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (TOML) describing tables and filters
    #[arg(short, long)]
    scenario: PathBuf,

    /// Optimizer config file; overrides the scenario's [config] section
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    config: OptimizerConfig,
    #[serde(default)]
    tables: Vec<TableSpec>,
    #[serde(default)]
    filters: Vec<FilterSpec>,
}

#[derive(Debug, Deserialize)]
struct TableSpec {
    name: String,
    row_count: f64,
    columns: Vec<Field>,
    #[serde(default)]
    partition_columns: Vec<Field>,
    /// Distinct-value counts by column name
    #[serde(default)]
    ndv: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct FilterSpec {
    #[serde(default)]
    name: Option<String>,
    table: String,
    predicate: NativeExpr,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let text = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("Failed to read scenario {}", args.scenario.display()))?;
    let scenario: Scenario = toml::from_str(&text)
        .with_context(|| format!("Failed to parse scenario {}", args.scenario.display()))?;

    let config = match &args.config {
        Some(path) => OptimizerConfig::load_from_file(path).context("Failed to load config")?,
        None => scenario.config.clone(),
    };

    let mut stats = TableStatistics::new();
    let mut scans = HashMap::new();
    for spec in scenario.tables {
        for (column, ndv) in &spec.ndv {
            stats.set_ndv(&spec.name, column, *ndv);
        }
        let table = TableMeta::new(spec.name.clone(), spec.columns)
            .with_partition_columns(spec.partition_columns)
            .with_row_count(spec.row_count);
        scans.insert(spec.name.to_lowercase(), RelNode::scan(table));
    }

    let translator = SymbolTranslator::global();
    let analyzer = FilterAnalyzer::new(translator, &stats, config);

    for (i, filter) in scenario.filters.iter().enumerate() {
        let label = filter
            .name
            .clone()
            .unwrap_or_else(|| format!("filter #{}", i + 1));
        let scan = scans
            .get(&filter.table.to_lowercase())
            .ok_or_else(|| anyhow!("{}: unknown table {}", label, filter.table))?;

        let translation = analyzer
            .analyze(scan, &filter.predicate)
            .with_context(|| format!("Failed to analyze {}", label))?;
        print_translation(&label, &filter.table, &translation);
    }

    Ok(())
}

fn print_translation(label: &str, table: &str, translation: &Translation) {
    println!("== {} on {}", label, table);
    match translation {
        Translation::Fallback { reason } => {
            println!("  fallback: {}", reason);
        }
        Translation::Cbo(analysis) => {
            println!("  predicate:   {}", analysis.predicate);
            match &analysis.pruning_ast {
                Some(ast) => println!("  pruning:     {}", ast),
                None => println!("  pruning:     none"),
            }
            match &analysis.residual_ast {
                Some(ast) => println!("  residual:    {}", ast),
                None => println!("  residual:    none"),
            }
            println!("  selectivity: {:.6}", analysis.selectivity);
            println!("  rows:        {:.1}", analysis.estimated_rows);
        }
    }
}
