//! FILENAME: core/engine/src/calculation.rs
//! Feasibility Calculation - derives the feasibility metrics of a scenario.
//!
//! This module takes a Scenario (assumptions) plus its line items and the
//! site area, and produces a CalculationResults snapshot.
//!
//! Algorithm (one pass, each stage reads only raw inputs or earlier stages):
//! 1. Site metrics (acres, density, recommended unit range)
//! 2. Unit mix rollups (NRSF, GBSF, gross potential rent)
//! 3. Revenue (other income, vacancy, net revenue)
//! 4. Budget (hard, soft, land, per-unit/per-SF costs)
//! 5. Operating expenses (categories, payroll, management fee, property tax)
//! 6. Returns (NOI, yield on cost)

use crate::numeric::{num, safe_div, sum_by};
use crate::results::{CalculationResults, PayrollRowResult, UnitMixRowResult};
use crate::scenario::{
    DensityBounds, PayrollLineType, PayrollRow, RentInputMode, Scenario, SoftCostDetailRow,
    UnitMixRow,
};

/// Square feet per acre.
pub const SF_PER_ACRE: f64 = 43_560.0;

/// Mil rates are expressed per thousand dollars of assessed value.
const MIL_DIVISOR: f64 = 1_000.0;

const MONTHS_PER_YEAR: f64 = 12.0;

// ============================================================================
// ROW-LEVEL FORMULAS
// ============================================================================

/// Effective monthly rent of one unit of this type.
pub fn effective_monthly_rent(row: &UnitMixRow) -> f64 {
    match row.rent_input_mode {
        RentInputMode::PerSf => num(row.rent_per_sf) * num(row.avg_unit_sf),
        RentInputMode::WholeDollar => num(row.rent_whole_dollar),
    }
}

/// Annual cost of one payroll line. Burden and bonus only apply to employees.
pub fn payroll_row_cost(row: &PayrollRow, payroll_burden_pct: f64) -> f64 {
    match row.line_type {
        PayrollLineType::Employee => {
            num(row.headcount)
                * num(row.base_compensation)
                * (1.0 + num(row.bonus_pct))
                * (1.0 + payroll_burden_pct)
        }
        PayrollLineType::Contract => num(row.fixed_amount),
    }
}

/// Per-row derived values for the unit mix, in input order.
pub fn unit_mix_breakdown(unit_mix: &[UnitMixRow]) -> Vec<UnitMixRowResult> {
    unit_mix
        .iter()
        .map(|row| {
            let unit_count = num(row.unit_count);
            let included = unit_count > 0.0;
            let monthly_rent = effective_monthly_rent(row);
            let avg_sf = num(row.avg_unit_sf);
            let (total_sf, monthly_revenue) = if included {
                (unit_count * avg_sf, unit_count * monthly_rent)
            } else {
                (0.0, 0.0)
            };
            UnitMixRowResult {
                unit_type: row.unit_type.clone(),
                unit_count,
                monthly_rent,
                rent_per_sf: safe_div(monthly_rent, avg_sf),
                total_sf,
                monthly_revenue,
                annual_revenue: monthly_revenue * MONTHS_PER_YEAR,
                included,
            }
        })
        .collect()
}

/// Per-row annual payroll cost, in input order.
pub fn payroll_breakdown(payroll: &[PayrollRow], payroll_burden_pct: Option<f64>) -> Vec<PayrollRowResult> {
    let burden = num(payroll_burden_pct);
    payroll
        .iter()
        .map(|row| PayrollRowResult {
            role: row.role.clone(),
            annual_cost: payroll_row_cost(row, burden),
        })
        .collect()
}

// ============================================================================
// FEASIBILITY CALCULATOR
// ============================================================================

/// Runs the staged derivation for one scenario.
pub struct FeasibilityCalculator<'a> {
    scenario: &'a Scenario,
    unit_mix: &'a [UnitMixRow],
    payroll: &'a [PayrollRow],
    soft_cost_details: &'a [SoftCostDetailRow],
    site_area_sf: f64,
    density: DensityBounds,

    /// Coalesced `total_units`, used as a denominator by several stages.
    total_units: f64,

    results: CalculationResults,
}

impl<'a> FeasibilityCalculator<'a> {
    pub fn new(
        scenario: &'a Scenario,
        unit_mix: &'a [UnitMixRow],
        payroll: &'a [PayrollRow],
        soft_cost_details: &'a [SoftCostDetailRow],
        site_area_sf: Option<f64>,
        density: Option<DensityBounds>,
    ) -> Self {
        FeasibilityCalculator {
            scenario,
            unit_mix,
            payroll,
            soft_cost_details,
            site_area_sf: num(site_area_sf),
            density: density.unwrap_or_default(),
            total_units: num(scenario.total_units),
            results: CalculationResults::default(),
        }
    }

    /// Executes every stage in dependency order and returns the snapshot.
    pub fn calculate(mut self) -> CalculationResults {
        self.compute_site_metrics();
        self.compute_unit_mix();
        self.compute_revenue();
        self.compute_budget();
        self.compute_operating_expenses();
        self.compute_returns();

        log::debug!(
            "calculate_all: units={} nrsf={} budget={} noi={} yoc={:.4}",
            self.total_units,
            self.results.total_nrsf,
            self.results.total_budget,
            self.results.noi,
            self.results.unlevered_yield_on_cost
        );

        self.results
    }

    fn compute_site_metrics(&mut self) {
        let r = &mut self.results;
        r.site_area_acres = self.site_area_sf / SF_PER_ACRE;
        r.density_units_per_acre = safe_div(self.total_units, r.site_area_acres);
        r.recommended_units_low = r.site_area_acres * num(self.density.low);
        r.recommended_units_high = r.site_area_acres * num(self.density.high);
    }

    fn compute_unit_mix(&mut self) {
        let mut total_nrsf = 0.0;
        let mut monthly_rent_total = 0.0;
        let mut unit_count = 0.0;

        for row in self.unit_mix {
            let count = num(row.unit_count);
            if count <= 0.0 {
                continue;
            }
            total_nrsf += count * num(row.avg_unit_sf);
            monthly_rent_total += count * effective_monthly_rent(row);
            unit_count += count;
        }

        let r = &mut self.results;
        r.total_nrsf = total_nrsf;
        r.unit_mix_unit_count = unit_count;
        r.gross_potential_rent = monthly_rent_total * MONTHS_PER_YEAR;
        r.total_gbsf = safe_div(total_nrsf, num(self.scenario.efficiency_ratio));
        r.weighted_avg_unit_sf = safe_div(total_nrsf, self.total_units);
        r.weighted_avg_rent_per_sf = safe_div(monthly_rent_total, total_nrsf);
        r.avg_monthly_rent_per_unit = safe_div(monthly_rent_total, unit_count);
    }

    fn compute_revenue(&mut self) {
        let s = self.scenario;
        let r = &mut self.results;
        r.other_income = num(s.other_income_per_unit_month) * self.total_units * MONTHS_PER_YEAR;
        r.gross_potential_revenue = r.gross_potential_rent + r.other_income;
        r.vacancy_loss = r.gross_potential_revenue * num(s.vacancy_rate);
        r.net_revenue = r.gross_potential_revenue - r.vacancy_loss;
    }

    fn compute_budget(&mut self) {
        let s = self.scenario;
        let r = &mut self.results;

        r.hard_cost = num(s.hard_cost_per_nrsf) * r.total_nrsf;
        r.hard_cost_per_gbsf = safe_div(r.hard_cost, r.total_gbsf);

        // Exactly one basis is authoritative.
        r.soft_cost = if s.use_detailed_soft_costs {
            sum_by(self.soft_cost_details, |row| num(row.amount))
        } else {
            r.hard_cost * num(s.soft_cost_pct)
        };

        r.land_cost = num(s.land_cost);
        r.total_budget = r.hard_cost + r.soft_cost + r.land_cost;

        r.cost_per_unit = safe_div(r.total_budget, self.total_units);
        r.cost_per_nrsf = safe_div(r.total_budget, r.total_nrsf);
        r.cost_per_gbsf = safe_div(r.total_budget, r.total_gbsf);
        r.land_cost_per_unit = safe_div(r.land_cost, self.total_units);
        r.land_cost_per_sf = safe_div(r.land_cost, self.site_area_sf);
    }

    fn compute_operating_expenses(&mut self) {
        let s = self.scenario;
        let burden = num(s.payroll_burden_pct);

        let opex_categories_total: f64 = s
            .opex_categories()
            .iter()
            .map(|(_, value)| num(*value))
            .sum();
        let payroll_total = sum_by(self.payroll, |row| payroll_row_cost(row, burden));

        let r = &mut self.results;
        r.opex_categories_total = opex_categories_total;
        r.payroll_total = payroll_total;
        r.mgmt_fee_total = r.net_revenue * num(s.mgmt_fee_pct);

        r.assessed_value = r.hard_cost * num(s.tax_assessed_pct_hard)
            + r.land_cost * num(s.tax_assessed_pct_land)
            + r.soft_cost * num(s.tax_assessed_pct_soft);
        r.property_tax_total = r.assessed_value * (num(s.tax_mil_rate) / MIL_DIVISOR);
        r.property_tax_per_unit = safe_div(r.property_tax_total, self.total_units);

        r.total_opex = r.opex_categories_total + r.payroll_total + r.mgmt_fee_total + r.property_tax_total;
        r.opex_per_unit = safe_div(r.total_opex, self.total_units);
        r.opex_ratio = safe_div(r.total_opex, r.net_revenue);
    }

    fn compute_returns(&mut self) {
        let r = &mut self.results;
        r.noi = r.net_revenue - r.total_opex;
        r.noi_per_unit = safe_div(r.noi, self.total_units);
        r.noi_per_sf = safe_div(r.noi, r.total_nrsf);
        r.unlevered_yield_on_cost = safe_div(r.noi, r.total_budget);
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Calculates every feasibility metric for a scenario.
/// This is the main entry point for the calculation engine. It never fails:
/// missing inputs and zero denominators yield zero.
pub fn calculate_all(
    scenario: &Scenario,
    unit_mix: &[UnitMixRow],
    payroll: &[PayrollRow],
    soft_cost_details: &[SoftCostDetailRow],
    site_area_sf: Option<f64>,
    density: Option<DensityBounds>,
) -> CalculationResults {
    FeasibilityCalculator::new(
        scenario,
        unit_mix,
        payroll,
        soft_cost_details,
        site_area_sf,
        density,
    )
    .calculate()
}
