use calib_core::RunSummary;
use serde::Serialize;

type Extractor = (&'static str, Box<dyn Fn(&RunSummary) -> Option<f64>>);

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub case_count: usize,
    pub completed_count: usize,
    pub rejected_count: usize,
    pub undetermined_count: usize,
    pub metrics: Vec<MetricSummary>,
}

#[derive(Debug, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub samples: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

/// Aggregate completed cases. `None` entries are rejected cases.
pub fn compute_summary(summaries: &[Option<&RunSummary>]) -> SummaryStats {
    let completed: Vec<&RunSummary> = summaries.iter().flatten().copied().collect();
    let undetermined_count = completed
        .iter()
        .filter(|s| !s.required_marks.is_determined())
        .count();

    let extractors: Vec<Extractor> = vec![
        (
            "required_marks",
            Box::new(|s| s.required_marks.count().map(f64::from)),
        ),
        ("event_count", Box::new(|s| Some(s.event_count as f64))),
        (
            "total_duration_s",
            Box::new(|s| s.total_duration_s.map(f64::from)),
        ),
        (
            "final_residual_m",
            Box::new(|s| Some(f64::from(s.final_residual_m))),
        ),
        (
            "mark_budget_usage_pct",
            Box::new(|s| {
                if s.estimated_marks == 0 {
                    None
                } else {
                    Some(100.0 * f64::from(s.marks_processed) / f64::from(s.estimated_marks))
                }
            }),
        ),
    ];

    let metrics = extractors
        .iter()
        .filter_map(|(name, extract)| {
            let values: Vec<f64> = completed.iter().filter_map(|s| extract(s)).collect();
            compute_metric_summary(name, &values)
        })
        .collect();

    SummaryStats {
        case_count: summaries.len(),
        completed_count: completed.len(),
        rejected_count: summaries.len() - completed.len(),
        undetermined_count,
        metrics,
    }
}

fn compute_metric_summary(name: &str, values: &[f64]) -> Option<MetricSummary> {
    if values.is_empty() {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    Some(MetricSummary {
        name: name.to_string(),
        samples: values.len(),
        mean,
        min,
        max,
        stddev: variance.sqrt(),
    })
}

pub fn print_summary(plan_name: &str, stats: &SummaryStats) {
    println!();
    println!(
        "=== Plan '{plan_name}': {} cases ({} completed, {} rejected, {} undetermined) ===",
        stats.case_count, stats.completed_count, stats.rejected_count, stats.undetermined_count
    );
    println!(
        "{:<24} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "metric", "samples", "mean", "min", "max", "stddev"
    );
    for metric in &stats.metrics {
        println!(
            "{:<24} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            metric.name, metric.samples, metric.mean, metric.min, metric.max, metric.stddev
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calib_core::{simulate, simulate_with_budget, summarize, CalibrationInput};

    fn metric<'a>(stats: &'a SummaryStats, name: &str) -> &'a MetricSummary {
        stats.metrics.iter().find(|m| m.name == name).unwrap()
    }

    #[test]
    fn aggregates_completed_cases_only() {
        let a = summarize(&simulate(&CalibrationInput::new(10.0, 2.0, 2)).unwrap());
        let b = summarize(&simulate(&CalibrationInput::new(10.0, 2.0, 4)).unwrap());
        let stats = compute_summary(&[Some(&a), None, Some(&b)]);

        assert_eq!(stats.case_count, 3);
        assert_eq!(stats.completed_count, 2);
        assert_eq!(stats.rejected_count, 1);
        assert_eq!(stats.undetermined_count, 0);

        let marks = metric(&stats, "required_marks");
        assert_eq!(marks.samples, 2);
        assert!((marks.mean - 17.0).abs() < 1e-9);
        assert!(marks.stddev.abs() < 1e-9);

        let events = metric(&stats, "event_count");
        assert!((events.min - 34.0).abs() < 1e-9);
        assert!((events.max - 68.0).abs() < 1e-9);
    }

    #[test]
    fn undetermined_cases_skip_required_marks() {
        let open = summarize(&simulate_with_budget(&CalibrationInput::new(10.0, 2.0, 2), 3).unwrap());
        let stats = compute_summary(&[Some(&open)]);
        assert_eq!(stats.undetermined_count, 1);
        assert!(stats.metrics.iter().all(|m| m.name != "required_marks"));
        assert_eq!(metric(&stats, "event_count").samples, 1);
    }

    #[test]
    fn all_rejected_yields_no_metrics() {
        let stats = compute_summary(&[None, None]);
        assert_eq!(stats.rejected_count, 2);
        assert!(stats.metrics.is_empty());
    }
}
