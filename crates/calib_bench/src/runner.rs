use crate::plan::CaseDef;
use anyhow::{Context, Result};
use calib_core::{report, RunSummary};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct CaseResult {
    pub case_index: usize,
    pub case_status: CaseStatus,
    pub max_cable_length: f32,
    pub support_height: f32,
    pub station_count: u32,
    pub mark_budget: Option<u32>,
    pub wall_time_us: u64,
    pub summary: Option<RunSummary>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Completed,
    Rejected,
}

pub fn case_dir_name(case_index: usize) -> String {
    format!("case_{case_index:03}")
}

/// Simulate one case and write its artifacts into `case_dir`.
///
/// Invalid input is not an error here: it produces a `Rejected` result so the
/// rest of the batch still runs. Only IO failures propagate.
pub fn run_case(case_index: usize, case: &CaseDef, case_dir: &Path) -> Result<CaseResult> {
    let start = Instant::now();
    let input = case.input();
    let outcome = match case.mark_budget {
        Some(budget) => calib_core::simulate_with_budget(&input, budget),
        None => calib_core::simulate(&input),
    };

    std::fs::create_dir_all(case_dir)
        .with_context(|| format!("creating case directory: {}", case_dir.display()))?;

    let (case_status, summary, error_message) = match outcome {
        Ok(run) => {
            report::write_run_csv(case_dir, &run)
                .with_context(|| format!("writing CSV reports in {}", case_dir.display()))?;
            (CaseStatus::Completed, Some(report::summarize(&run)), None)
        }
        Err(err) => {
            tracing::warn!(case_index, %err, "case rejected");
            (CaseStatus::Rejected, None, Some(err.to_string()))
        }
    };

    #[allow(clippy::cast_possible_truncation)]
    let wall_time_us = start.elapsed().as_micros() as u64;

    let result = CaseResult {
        case_index,
        case_status,
        max_cable_length: case.max_cable_length,
        support_height: case.support_height,
        station_count: case.station_count,
        mark_budget: case.mark_budget,
        wall_time_us,
        summary,
        error_message,
    };
    write_json_atomic(&case_dir.join("case_result.json"), &result)?;
    Ok(result)
}

/// Write JSON to a temp file then rename into place.
pub fn write_json_atomic(path: &Path, value: &impl Serialize) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value).context("serializing JSON")?;
    let mut file =
        std::fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", tmp.display()))?;
    file.sync_all()?;
    std::fs::rename(&tmp, path).with_context(|| format!("renaming {}", tmp.display()))?;
    Ok(())
}
