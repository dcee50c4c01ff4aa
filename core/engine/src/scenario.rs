//! FILENAME: core/engine/src/scenario.rs
//! PURPOSE: Input records for the feasibility calculation.
//! CONTEXT: A scenario ("one-pager") is a flat record of assumptions for one
//! development concept on a pursuit site. Line items (unit mix, payroll, soft
//! cost detail) are separate collections. Every numeric field is nullable
//! because forms save partially filled records; the calculation coalesces
//! missing values to zero.

use serde::{Deserialize, Serialize};

use crate::calculation::calculate_all;
use crate::error::EngineError;
use crate::results::CalculationResults;

// ============================================================================
// SCENARIO
// ============================================================================

/// The assumption record for one development scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: Option<String>,

    pub total_units: Option<f64>,
    /// NRSF / GBSF.
    pub efficiency_ratio: Option<f64>,
    pub vacancy_rate: Option<f64>,
    pub other_income_per_unit_month: Option<f64>,

    pub hard_cost_per_nrsf: Option<f64>,
    pub land_cost: Option<f64>,
    /// Fraction of hard cost. Ignored when `use_detailed_soft_costs` is set.
    pub soft_cost_pct: Option<f64>,
    pub use_detailed_soft_costs: bool,

    // Annual dollar totals, summed as-is.
    pub opex_utilities: Option<f64>,
    pub opex_repairs_maintenance: Option<f64>,
    pub opex_contract_services: Option<f64>,
    pub opex_marketing: Option<f64>,
    pub opex_general_admin: Option<f64>,
    pub opex_turnover: Option<f64>,
    pub opex_misc: Option<f64>,
    pub opex_insurance: Option<f64>,

    /// Fraction of net revenue.
    pub mgmt_fee_pct: Option<f64>,
    /// Multiplier on base employee payroll cost.
    pub payroll_burden_pct: Option<f64>,

    /// Tax per $1,000 of assessed value.
    pub tax_mil_rate: Option<f64>,
    pub tax_assessed_pct_hard: Option<f64>,
    pub tax_assessed_pct_land: Option<f64>,
    pub tax_assessed_pct_soft: Option<f64>,
}

impl Scenario {
    /// The eight operating expense categories in display order.
    pub fn opex_categories(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("utilities", self.opex_utilities),
            ("repairs_maintenance", self.opex_repairs_maintenance),
            ("contract_services", self.opex_contract_services),
            ("marketing", self.opex_marketing),
            ("general_admin", self.opex_general_admin),
            ("turnover", self.opex_turnover),
            ("misc", self.opex_misc),
            ("insurance", self.opex_insurance),
        ]
    }
}

// ============================================================================
// UNIT MIX
// ============================================================================

/// How the rent of a unit-mix row was entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentInputMode {
    #[default]
    PerSf,
    WholeDollar,
}

/// One unit type within a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitMixRow {
    pub unit_type: Option<String>,
    pub unit_count: Option<f64>,
    pub avg_unit_sf: Option<f64>,
    pub rent_input_mode: RentInputMode,
    pub rent_per_sf: Option<f64>,
    pub rent_whole_dollar: Option<f64>,
    pub sort_order: i32,
}

impl UnitMixRow {
    /// Creates a per-SF row.
    pub fn per_sf(unit_count: f64, avg_unit_sf: f64, rent_per_sf: f64) -> Self {
        UnitMixRow {
            unit_count: Some(unit_count),
            avg_unit_sf: Some(avg_unit_sf),
            rent_input_mode: RentInputMode::PerSf,
            rent_per_sf: Some(rent_per_sf),
            ..Default::default()
        }
    }

    /// Creates a whole-dollar row.
    pub fn whole_dollar(unit_count: f64, avg_unit_sf: f64, monthly_rent: f64) -> Self {
        UnitMixRow {
            unit_count: Some(unit_count),
            avg_unit_sf: Some(avg_unit_sf),
            rent_input_mode: RentInputMode::WholeDollar,
            rent_whole_dollar: Some(monthly_rent),
            ..Default::default()
        }
    }
}

// ============================================================================
// PAYROLL
// ============================================================================

/// Whether a payroll line is an employee position or a contracted service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollLineType {
    #[default]
    Employee,
    Contract,
}

/// One staffing line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollRow {
    pub role: Option<String>,
    pub line_type: PayrollLineType,
    pub headcount: Option<f64>,
    /// Annual, per head.
    pub base_compensation: Option<f64>,
    pub bonus_pct: Option<f64>,
    /// Annual amount for contract lines.
    pub fixed_amount: Option<f64>,
}

impl PayrollRow {
    pub fn employee(headcount: f64, base_compensation: f64, bonus_pct: f64) -> Self {
        PayrollRow {
            line_type: PayrollLineType::Employee,
            headcount: Some(headcount),
            base_compensation: Some(base_compensation),
            bonus_pct: Some(bonus_pct),
            ..Default::default()
        }
    }

    pub fn contract(fixed_amount: f64) -> Self {
        PayrollRow {
            line_type: PayrollLineType::Contract,
            fixed_amount: Some(fixed_amount),
            ..Default::default()
        }
    }
}

// ============================================================================
// SOFT COST DETAIL
// ============================================================================

/// A named soft cost line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftCostDetailRow {
    pub name: Option<String>,
    pub amount: Option<f64>,
}

impl SoftCostDetailRow {
    pub fn new(name: &str, amount: f64) -> Self {
        SoftCostDetailRow {
            name: Some(name.to_string()),
            amount: Some(amount),
        }
    }
}

// ============================================================================
// SITE / PRODUCT TYPE
// ============================================================================

/// Recommended density range for the product type, in units per acre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityBounds {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl DensityBounds {
    pub fn new(low: f64, high: f64) -> Self {
        DensityBounds {
            low: Some(low),
            high: Some(high),
        }
    }
}

// ============================================================================
// INPUT BUNDLE
// ============================================================================

/// Everything one calculation reads, in the shape the persistence layer
/// hands over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInputs {
    pub scenario: Scenario,
    #[serde(alias = "unitMix")]
    pub unit_mix: Vec<UnitMixRow>,
    pub payroll: Vec<PayrollRow>,
    #[serde(alias = "softCostDetails")]
    pub soft_cost_details: Vec<SoftCostDetailRow>,
    #[serde(alias = "siteAreaSf")]
    pub site_area_sf: Option<f64>,
    pub density: Option<DensityBounds>,
}

impl ScenarioInputs {
    /// Parses an input bundle from JSON.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let inputs: ScenarioInputs = serde_json::from_str(json)?;
        Ok(inputs)
    }

    /// Runs the full calculation over this bundle.
    pub fn calculate(&self) -> CalculationResults {
        calculate_all(
            &self.scenario,
            &self.unit_mix,
            &self.payroll,
            &self.soft_cost_details,
            self.site_area_sf,
            self.density,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_deserializes_with_missing_and_null_fields() {
        let scenario: Scenario =
            serde_json::from_str(r#"{"total_units": 120, "land_cost": null}"#).unwrap();
        assert_eq!(scenario.total_units, Some(120.0));
        assert_eq!(scenario.land_cost, None);
        assert!(!scenario.use_detailed_soft_costs);
    }

    #[test]
    fn test_enums_use_snake_case() {
        let row: UnitMixRow =
            serde_json::from_str(r#"{"unit_count": 4, "rent_input_mode": "whole_dollar"}"#).unwrap();
        assert_eq!(row.rent_input_mode, RentInputMode::WholeDollar);

        let payroll: PayrollRow =
            serde_json::from_str(r#"{"line_type": "contract", "fixed_amount": 1000}"#).unwrap();
        assert_eq!(payroll.line_type, PayrollLineType::Contract);
    }

    #[test]
    fn test_inputs_from_json_accepts_camel_case_collections() {
        let inputs = ScenarioInputs::from_json(
            r#"{
                "scenario": {"total_units": 2},
                "unitMix": [{"unit_count": 2, "avg_unit_sf": 700, "rent_per_sf": 2.0}],
                "siteAreaSf": 43560
            }"#,
        )
        .unwrap();
        assert_eq!(inputs.unit_mix.len(), 1);
        assert_eq!(inputs.site_area_sf, Some(43560.0));
    }

    #[test]
    fn test_inputs_from_json_rejects_malformed_document() {
        let err = ScenarioInputs::from_json("{not json").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }

    #[test]
    fn test_opex_categories_lists_all_eight() {
        let scenario = Scenario {
            opex_insurance: Some(5.0),
            ..Default::default()
        };
        let categories = scenario.opex_categories();
        assert_eq!(categories.len(), 8);
        assert_eq!(categories[7], ("insurance", Some(5.0)));
    }
}
