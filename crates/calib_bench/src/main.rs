use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod plan;
mod runner;
mod summary;

#[derive(Parser)]
#[command(
    name = "calib_bench",
    about = "Batch runner for calibration plans across many frame configurations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every case of a plan file.
    Run {
        /// Path to the plan JSON file.
        #[arg(long)]
        plan: String,
        /// Output directory (default: runs/).
        #[arg(long, default_value = "runs")]
        output_dir: String,
    },
}

fn run(plan_path: &str, output_dir: &str) -> Result<()> {
    let plan = plan::load_plan(Path::new(plan_path))?;
    let cases = plan.expand();

    println!("Loading plan '{}': {} cases", plan.name, cases.len());

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_dir = PathBuf::from(output_dir).join(format!("{}_{}", plan.name, timestamp));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating output directory: {}", run_dir.display()))?;
    std::fs::copy(plan_path, run_dir.join("plan.json")).context("copying plan file")?;

    println!("Output: {}", run_dir.display());

    let results: Vec<Result<runner::CaseResult>> = cases
        .par_iter()
        .enumerate()
        .map(|(index, case)| {
            let case_dir = run_dir.join(runner::case_dir_name(index));
            runner::run_case(index, case, &case_dir)
        })
        .collect();

    let mut case_results = Vec::new();
    for result in results {
        match result {
            Ok(case_result) => case_results.push(case_result),
            Err(err) => error!("case failed: {err:#}"),
        }
    }
    if case_results.is_empty() {
        anyhow::bail!("all cases failed");
    }

    let summaries: Vec<Option<&calib_core::RunSummary>> =
        case_results.iter().map(|r| r.summary.as_ref()).collect();
    let stats = summary::compute_summary(&summaries);
    summary::print_summary(&plan.name, &stats);

    let batch_summary = serde_json::json!({
        "batch_schema_version": 1,
        "batch_id": Uuid::new_v4().to_string(),
        "plan_name": plan.name,
        "report_version": calib_core::REPORT_VERSION,
        "cases": case_results,
        "aggregated_metrics": stats,
    });
    let summary_path = run_dir.join("summary.json");
    runner::write_json_atomic(&summary_path, &batch_summary)?;

    info!(path = %summary_path.display(), "batch summary written");
    println!("Summary written to {}", summary_path.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { plan, output_dir } => run(&plan, &output_dir)?,
    }
    Ok(())
}
