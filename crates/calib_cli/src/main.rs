use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod output;
mod prompt;
mod table;

use prompt::PartialInput;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "calib_cli", about = "CDPR event-based auto-calibration planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one calibration run. Missing inputs are prompted for.
    Run {
        /// Maximum cable length [m].
        #[arg(long)]
        max_cable_length: Option<f32>,
        /// Vertical support height [m].
        #[arg(long)]
        support_height: Option<f32>,
        /// Number of sensor stations.
        #[arg(long)]
        stations: Option<u32>,
        /// Process at most this many marks instead of the length-based estimate.
        #[arg(long)]
        mark_budget: Option<u32>,
        /// Write events.csv, stations.csv and run.json under this directory.
        #[arg(long)]
        output_dir: Option<String>,
        /// Print the run as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

fn run(
    partial: PartialInput,
    mark_budget: Option<u32>,
    output_dir: Option<&str>,
    json: bool,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if !partial.is_complete() {
        writeln!(out)?;
    }
    let input = partial.complete(&mut std::io::stdin().lock(), &mut out)?;

    let calibration = match mark_budget {
        Some(budget) => calib_core::simulate_with_budget(&input, budget),
        None => calib_core::simulate(&input),
    }
    .context("invalid calibration input")?;

    info!(
        events = calibration.events.len(),
        required_marks = ?calibration.required_marks.count(),
        "simulation finished"
    );

    if json {
        serde_json::to_writer_pretty(&mut out, &calibration).context("serializing run")?;
        writeln!(out)?;
    } else {
        table::print_events(&mut out, &calibration)?;
        table::print_stations(&mut out, &calibration.stations)?;
    }

    if let Some(dir) = output_dir {
        let run_id = output::run_id(&calibration, chrono::Utc::now());
        let run_dir = output::create_run_dir(Path::new(dir), &run_id)?;
        output::write_artifacts(&run_dir, &run_id, &calibration)?;
        info!(dir = %run_dir.display(), "reports written");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            max_cable_length,
            support_height,
            stations,
            mark_budget,
            output_dir,
            json,
        } => {
            let partial = PartialInput {
                max_cable_length,
                support_height,
                station_count: stations,
            };
            run(partial, mark_budget, output_dir.as_deref(), json)?;
        }
    }
    Ok(())
}
