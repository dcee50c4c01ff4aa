//! FILENAME: core/report-engine/src/lib.rs
//! Report aggregation subsystem.
//!
//! This crate provides the report engine as a standalone module, separate
//! from the feasibility calculation engine. It depends on `engine` only for
//! number formatting and for the CalculationResults carried by pursuit rows.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the report IS)
//! - `value` / `registry`: How fields are read, formatted and rolled up
//! - `view`: Output consumed by the table/export layer (WHAT we display)
//! - `engine`: Filter, sort, group and aggregate (HOW we calculate)
//! - `pursuit` / `land_comp`: Concrete rows and registries

pub mod definition;
pub mod engine;
pub mod error;
pub mod land_comp;
pub mod pursuit;
pub mod registry;
pub mod value;
pub mod view;

pub use definition::*;
pub use self::engine::{compute_aggregates, run_report_engine, ReportCalculator};
pub use error::ReportError;
pub use land_comp::{land_comp_registry, LandComp, LandCompField, LandCompReportRow};
pub use pursuit::{
    pursuit_registry, Pursuit, PursuitField, PursuitReportRow, PursuitStage, ScenarioSummary,
};
pub use registry::{FieldDefinition, FieldRegistry};
pub use value::FieldValue;
pub use view::{Aggregates, GroupNode, ReportEngineResult, EMPTY_GROUP_LABEL};
