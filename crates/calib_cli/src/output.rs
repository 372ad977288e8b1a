use anyhow::{Context, Result};
use calib_core::{report, CalibrationRun};
use std::path::{Path, PathBuf};

/// Directory name for one run: UTC timestamp plus the three inputs.
pub fn run_id(run: &CalibrationRun, now: chrono::DateTime<chrono::Utc>) -> String {
    format!(
        "{}_L{}_H{}_S{}",
        now.format("%Y%m%d_%H%M%S"),
        run.input.max_cable_length,
        run.input.support_height,
        run.input.station_count,
    )
}

pub fn create_run_dir(output_dir: &Path, run_id: &str) -> Result<PathBuf> {
    let dir = output_dir.join(run_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating run directory: {}", dir.display()))?;
    Ok(dir)
}

/// Write `events.csv`, `stations.csv` and `run.json` into `dir`.
pub fn write_artifacts(dir: &Path, run_id: &str, run: &CalibrationRun) -> Result<()> {
    report::write_run_csv(dir, run)
        .with_context(|| format!("writing CSV reports in {}", dir.display()))?;

    let document = serde_json::json!({
        "run_id": run_id,
        "runner": "calib_cli",
        "summary": report::summarize(run),
        "run": run,
    });
    let path = dir.join("run.json");
    let file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, &document)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
