//! FILENAME: tests/common/mod.rs
//! Fixtures and assertions shared by the calculation integration tests.

#![allow(dead_code)]

use engine::{PayrollRow, Scenario, SoftCostDetailRow, UnitMixRow};

/// Asserts two floats agree within a relative tolerance.
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// The 100-unit garden scenario used across the tests.
pub fn baseline_scenario() -> Scenario {
    Scenario {
        name: Some("Baseline".to_string()),
        total_units: Some(100.0),
        efficiency_ratio: Some(0.85),
        vacancy_rate: Some(0.07),
        hard_cost_per_nrsf: Some(180.0),
        land_cost: Some(2_000_000.0),
        soft_cost_pct: Some(0.30),
        mgmt_fee_pct: Some(0.03),
        tax_mil_rate: Some(0.0),
        ..Default::default()
    }
}

pub fn baseline_unit_mix() -> Vec<UnitMixRow> {
    vec![UnitMixRow::per_sf(100.0, 850.0, 1.80)]
}

/// A fully loaded scenario with every stage contributing.
pub fn loaded_scenario() -> Scenario {
    Scenario {
        name: Some("Loaded".to_string()),
        total_units: Some(240.0),
        efficiency_ratio: Some(0.82),
        vacancy_rate: Some(0.05),
        other_income_per_unit_month: Some(75.0),
        hard_cost_per_nrsf: Some(210.0),
        land_cost: Some(6_500_000.0),
        soft_cost_pct: Some(0.25),
        opex_utilities: Some(180_000.0),
        opex_repairs_maintenance: Some(96_000.0),
        opex_contract_services: Some(72_000.0),
        opex_marketing: Some(48_000.0),
        opex_general_admin: Some(60_000.0),
        opex_turnover: Some(36_000.0),
        opex_misc: Some(12_000.0),
        opex_insurance: Some(144_000.0),
        mgmt_fee_pct: Some(0.03),
        payroll_burden_pct: Some(0.30),
        tax_mil_rate: Some(22.5),
        tax_assessed_pct_hard: Some(0.85),
        tax_assessed_pct_land: Some(1.0),
        tax_assessed_pct_soft: Some(0.5),
        ..Default::default()
    }
}

pub fn loaded_unit_mix() -> Vec<UnitMixRow> {
    vec![
        UnitMixRow::per_sf(96.0, 720.0, 2.05),
        UnitMixRow::per_sf(120.0, 1_050.0, 1.85),
        UnitMixRow::whole_dollar(24.0, 1_350.0, 2_650.0),
        UnitMixRow::per_sf(0.0, 1_500.0, 1.75),
    ]
}

pub fn loaded_payroll() -> Vec<PayrollRow> {
    vec![
        PayrollRow::employee(1.0, 85_000.0, 0.10),
        PayrollRow::employee(2.0, 48_000.0, 0.05),
        PayrollRow::contract(30_000.0),
    ]
}

pub fn soft_cost_details() -> Vec<SoftCostDetailRow> {
    vec![
        SoftCostDetailRow::new("Architecture & Engineering", 1_250_000.0),
        SoftCostDetailRow::new("Permits & Fees", 640_000.0),
        SoftCostDetailRow::new("Financing", 910_000.0),
    ]
}
