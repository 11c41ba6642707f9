use anyhow::{Context, Result};
use std::env;

use border_analytics::{aggregate, load_csv, write_report, ReportSummary, RunConfig, VERSION};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = RunConfig::from_env()?.with_args(env::args().skip(1))?;

    run_report(&config)
}

fn run_report(config: &RunConfig) -> Result<()> {
    println!("🛂 Border Analytics v{} - Monthly totals + trailing averages", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load CSV
    println!("\n📂 Loading {}...", config.input_path.display());
    let records = load_csv(&config.input_path)?;
    println!("✓ Loaded {} records", records.len());

    // 2. Aggregate
    println!("\n🧮 Aggregating {} border(s): {}", config.categories.len(), config.categories.join(", "));
    let mut rows = aggregate(&records, &config.categories)
        .with_context(|| format!("Aggregation failed for {}", config.input_path.display()))?;

    // 3. Write report
    println!("\n💾 Writing {:?} report to {}...", config.format, config.output_path.display());
    let written = write_report(&config.output_path, &mut rows, config.format)?;
    println!("✓ Wrote {} rows", written);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ {}", ReportSummary::from_rows(&rows).summary());

    Ok(())
}
