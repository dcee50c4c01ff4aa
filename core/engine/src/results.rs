//! FILENAME: core/engine/src/results.rs
//! PURPOSE: The derived feasibility snapshot and per-row breakdowns.
//! CONTEXT: Results are recomputed from scratch on every call and never
//! mutated afterwards. Every field is always populated; degenerate inputs
//! yield zeros.

use serde::{Deserialize, Serialize};

/// All derived metrics for one scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    // Site
    pub site_area_acres: f64,
    pub density_units_per_acre: f64,
    pub recommended_units_low: f64,
    pub recommended_units_high: f64,

    // Unit mix
    pub total_nrsf: f64,
    pub total_gbsf: f64,
    pub unit_mix_unit_count: f64,
    pub weighted_avg_unit_sf: f64,
    /// Per SF per month.
    pub weighted_avg_rent_per_sf: f64,
    pub avg_monthly_rent_per_unit: f64,
    pub gross_potential_rent: f64,

    // Revenue
    pub other_income: f64,
    pub gross_potential_revenue: f64,
    pub vacancy_loss: f64,
    pub net_revenue: f64,

    // Budget
    pub hard_cost: f64,
    pub hard_cost_per_gbsf: f64,
    pub soft_cost: f64,
    pub land_cost: f64,
    pub total_budget: f64,
    pub cost_per_unit: f64,
    pub cost_per_nrsf: f64,
    pub cost_per_gbsf: f64,
    pub land_cost_per_unit: f64,
    pub land_cost_per_sf: f64,

    // Operating expenses
    pub opex_categories_total: f64,
    pub payroll_total: f64,
    pub mgmt_fee_total: f64,
    pub assessed_value: f64,
    pub property_tax_total: f64,
    pub property_tax_per_unit: f64,
    pub total_opex: f64,
    pub opex_per_unit: f64,
    pub opex_ratio: f64,

    // Returns
    pub noi: f64,
    pub noi_per_unit: f64,
    pub noi_per_sf: f64,
    /// The scenario's headline metric.
    pub unlevered_yield_on_cost: f64,
}

impl CalculationResults {
    /// Every metric as a (name, value) pair, in declaration order.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("site_area_acres", self.site_area_acres),
            ("density_units_per_acre", self.density_units_per_acre),
            ("recommended_units_low", self.recommended_units_low),
            ("recommended_units_high", self.recommended_units_high),
            ("total_nrsf", self.total_nrsf),
            ("total_gbsf", self.total_gbsf),
            ("unit_mix_unit_count", self.unit_mix_unit_count),
            ("weighted_avg_unit_sf", self.weighted_avg_unit_sf),
            ("weighted_avg_rent_per_sf", self.weighted_avg_rent_per_sf),
            ("avg_monthly_rent_per_unit", self.avg_monthly_rent_per_unit),
            ("gross_potential_rent", self.gross_potential_rent),
            ("other_income", self.other_income),
            ("gross_potential_revenue", self.gross_potential_revenue),
            ("vacancy_loss", self.vacancy_loss),
            ("net_revenue", self.net_revenue),
            ("hard_cost", self.hard_cost),
            ("hard_cost_per_gbsf", self.hard_cost_per_gbsf),
            ("soft_cost", self.soft_cost),
            ("land_cost", self.land_cost),
            ("total_budget", self.total_budget),
            ("cost_per_unit", self.cost_per_unit),
            ("cost_per_nrsf", self.cost_per_nrsf),
            ("cost_per_gbsf", self.cost_per_gbsf),
            ("land_cost_per_unit", self.land_cost_per_unit),
            ("land_cost_per_sf", self.land_cost_per_sf),
            ("opex_categories_total", self.opex_categories_total),
            ("payroll_total", self.payroll_total),
            ("mgmt_fee_total", self.mgmt_fee_total),
            ("assessed_value", self.assessed_value),
            ("property_tax_total", self.property_tax_total),
            ("property_tax_per_unit", self.property_tax_per_unit),
            ("total_opex", self.total_opex),
            ("opex_per_unit", self.opex_per_unit),
            ("opex_ratio", self.opex_ratio),
            ("noi", self.noi),
            ("noi_per_unit", self.noi_per_unit),
            ("noi_per_sf", self.noi_per_sf),
            ("unlevered_yield_on_cost", self.unlevered_yield_on_cost),
        ]
    }

    /// True when every metric is a finite number.
    pub fn is_finite(&self) -> bool {
        self.metrics().iter().all(|(_, v)| v.is_finite())
    }
}

/// Derived values for a single unit-mix row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitMixRowResult {
    pub unit_type: Option<String>,
    pub unit_count: f64,
    pub monthly_rent: f64,
    pub rent_per_sf: f64,
    pub total_sf: f64,
    pub monthly_revenue: f64,
    pub annual_revenue: f64,
    /// False for rows with no units; they stay in the list but add nothing.
    pub included: bool,
}

/// Annual cost of a single payroll row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollRowResult {
    pub role: Option<String>,
    pub annual_cost: f64,
}
