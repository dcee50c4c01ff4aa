//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the report engine integration tests.

#![allow(dead_code)]

use engine::{CalculationResults, Scenario};
use report_engine::{Pursuit, PursuitReportRow, PursuitStage, ScenarioSummary};

/// A pursuit row with no scenarios.
pub fn pursuit(name: &str, region: Option<&str>, stage: Option<&str>) -> PursuitReportRow {
    PursuitReportRow {
        pursuit: Pursuit {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            region: region.map(str::to_string),
            ..Default::default()
        },
        stage: stage.map(|s| PursuitStage {
            name: s.to_string(),
            sort_order: 0,
        }),
        scenarios: Vec::new(),
    }
}

/// A pursuit row whose primary scenario has the given units, budget and NOI.
pub fn pursuit_with_metrics(
    name: &str,
    region: Option<&str>,
    stage: Option<&str>,
    total_units: f64,
    total_budget: f64,
    noi: f64,
) -> PursuitReportRow {
    let mut row = pursuit(name, region, stage);
    row.scenarios.push(ScenarioSummary {
        scenario: Scenario {
            total_units: Some(total_units),
            ..Default::default()
        },
        results: CalculationResults {
            total_budget,
            noi,
            cost_per_unit: total_budget / total_units,
            unlevered_yield_on_cost: noi / total_budget,
            ..Default::default()
        },
        is_primary: true,
    });
    row
}

/// The three-row region fixture: DFW, ATX, DFW.
pub fn region_rows() -> Vec<PursuitReportRow> {
    vec![
        pursuit("Elm Street", Some("DFW"), Some("Active")),
        pursuit("Lamar Yards", Some("ATX"), Some("Active")),
        pursuit("Trinity Mill", Some("DFW"), Some("Dead")),
    ]
}

/// A portfolio with metrics across regions and stages.
pub fn portfolio() -> Vec<PursuitReportRow> {
    vec![
        pursuit_with_metrics("Elm Street", Some("DFW"), Some("Active"), 300.0, 90_000_000.0, 5_400_000.0),
        pursuit_with_metrics("Lamar Yards", Some("ATX"), Some("Active"), 240.0, 72_000_000.0, 4_680_000.0),
        pursuit_with_metrics("Trinity Mill", Some("DFW"), Some("Dead"), 180.0, 45_000_000.0, 2_700_000.0),
        pursuit_with_metrics("Bishop Arts", Some("DFW"), Some("Active"), 120.0, 30_000_000.0, 2_100_000.0),
        pursuit("Mueller Lot", Some("ATX"), Some("Screening")),
        pursuit("Unassigned Parcel", None, None),
    ]
}
