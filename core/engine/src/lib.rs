//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the feasibility calculation engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod calculation;
pub mod error;
pub mod number_format;
pub mod numeric;
pub mod results;
pub mod scenario;

// Re-export commonly used types at the crate root
pub use calculation::{
    calculate_all, effective_monthly_rent, payroll_breakdown, payroll_row_cost, unit_mix_breakdown,
    FeasibilityCalculator, SF_PER_ACRE,
};
pub use error::EngineError;
pub use number_format::{format_number, format_optional, presets, NumberFormat, MISSING_VALUE};
pub use numeric::{num, safe_div};
pub use results::{CalculationResults, PayrollRowResult, UnitMixRowResult};
pub use scenario::{
    DensityBounds, PayrollLineType, PayrollRow, RentInputMode, Scenario, ScenarioInputs,
    SoftCostDetailRow, UnitMixRow,
};
