use anyhow::{bail, Context, Result};
use calib_core::CalibrationInput;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Plan {
    pub name: String,
    #[serde(flatten)]
    pub cases: CaseSpec,
    /// Applied to every case that does not set its own budget.
    #[serde(default)]
    pub mark_budget: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CaseDef {
    pub max_cable_length: f32,
    pub support_height: f32,
    pub station_count: u32,
    #[serde(default)]
    pub mark_budget: Option<u32>,
}

impl CaseDef {
    pub fn input(&self) -> CalibrationInput {
        CalibrationInput::new(self.max_cable_length, self.support_height, self.station_count)
    }
}

#[derive(Debug, Deserialize)]
pub struct Grid {
    pub max_cable_length: Vec<f32>,
    pub support_height: Vec<f32>,
    pub station_count: Vec<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSpec {
    Cases(Vec<CaseDef>),
    Grid(Grid),
}

impl Plan {
    /// Explicit cases as written, or the cartesian product of the grid axes
    /// (cable length outermost, station count innermost).
    pub fn expand(&self) -> Vec<CaseDef> {
        let mut cases = match &self.cases {
            CaseSpec::Cases(cases) => cases.clone(),
            CaseSpec::Grid(grid) => {
                let mut cases = Vec::new();
                for &max_cable_length in &grid.max_cable_length {
                    for &support_height in &grid.support_height {
                        for &station_count in &grid.station_count {
                            cases.push(CaseDef {
                                max_cable_length,
                                support_height,
                                station_count,
                                mark_budget: None,
                            });
                        }
                    }
                }
                cases
            }
        };
        for case in &mut cases {
            case.mark_budget = case.mark_budget.or(self.mark_budget);
        }
        cases
    }
}

pub fn load_plan(path: &Path) -> Result<Plan> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading plan file: {}", path.display()))?;
    let plan: Plan = serde_json::from_str(&json)
        .with_context(|| format!("parsing plan file: {}", path.display()))?;
    if plan.name.is_empty() {
        bail!("plan 'name' must not be empty");
    }
    if plan.expand().is_empty() {
        bail!("plan must produce at least one case");
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_plan(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_plan_with_case_list() {
        let file = write_temp_plan(
            r#"{
            "name": "frame_a",
            "cases": [
                {"max_cable_length": 10.0, "support_height": 2.0, "station_count": 2},
                {"max_cable_length": 12.0, "support_height": 3.0, "station_count": 4, "mark_budget": 5}
            ]
        }"#,
        );
        let plan = load_plan(file.path()).unwrap();
        assert_eq!(plan.name, "frame_a");
        let cases = plan.expand();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].station_count, 2);
        assert_eq!(cases[0].mark_budget, None);
        assert_eq!(cases[1].mark_budget, Some(5));
    }

    #[test]
    fn test_load_plan_with_grid() {
        let file = write_temp_plan(
            r#"{
            "name": "sweep",
            "grid": {
                "max_cable_length": [8.0, 10.0],
                "support_height": [2.0],
                "station_count": [2, 3, 4]
            }
        }"#,
        );
        let cases = load_plan(file.path()).unwrap().expand();
        assert_eq!(cases.len(), 6);
        assert_eq!(cases[0].station_count, 2);
        assert_eq!(cases[3].station_count, 2);
        assert!(cases[3].max_cable_length > cases[0].max_cable_length);
    }

    #[test]
    fn test_plan_budget_applies_to_cases_without_one() {
        let file = write_temp_plan(
            r#"{
            "name": "budgeted",
            "mark_budget": 3,
            "cases": [
                {"max_cable_length": 10.0, "support_height": 2.0, "station_count": 2},
                {"max_cable_length": 10.0, "support_height": 2.0, "station_count": 2, "mark_budget": 40}
            ]
        }"#,
        );
        let cases = load_plan(file.path()).unwrap().expand();
        assert_eq!(cases[0].mark_budget, Some(3));
        assert_eq!(cases[1].mark_budget, Some(40));
    }

    #[test]
    fn test_load_plan_empty_name_fails() {
        let file = write_temp_plan(r#"{"name": "", "cases": [{"max_cable_length": 1.0, "support_height": 0.5, "station_count": 2}]}"#);
        let result = load_plan(file.path());
        assert!(result.unwrap_err().to_string().contains("name"));
    }

    #[test]
    fn test_load_plan_without_cases_fails() {
        let file = write_temp_plan(r#"{"name": "empty", "cases": []}"#);
        assert!(load_plan(file.path()).is_err());

        let file = write_temp_plan(
            r#"{"name": "empty_grid", "grid": {"max_cable_length": [], "support_height": [1.0], "station_count": [2]}}"#,
        );
        assert!(load_plan(file.path()).is_err());
    }
}
