//! FILENAME: core/report-engine/src/pursuit.rs
//! Pursuit report rows and their field registry.
//!
//! A pursuit row bundles the site record with its pipeline stage and its
//! scenarios. Financial columns come from the primary scenario's
//! CalculationResults, so a pursuit without scenarios reports blanks (and is
//! skipped by the rollups) rather than zeros.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use engine::{CalculationResults, Scenario, ScenarioInputs, SF_PER_ACRE};

use crate::definition::{AggregationMode, FieldType};
use crate::error::ReportError;
use crate::registry::{FieldDefinition, FieldRegistry};
use crate::value::FieldValue;

// ============================================================================
// ROW TYPES
// ============================================================================

/// The parent site record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pursuit {
    pub id: String,
    pub name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub product_type: Option<String>,
    pub site_area_sf: Option<f64>,
    /// ISO-8601 date.
    pub created_at: Option<String>,
    pub is_archived: bool,
}

/// Pipeline stage of a pursuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitStage {
    pub name: String,
    pub sort_order: i32,
}

/// A scenario with its calculated results attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario: Scenario,
    pub results: CalculationResults,
    #[serde(default)]
    pub is_primary: bool,
}

impl ScenarioSummary {
    /// Calculates the scenario and wraps it for reporting.
    pub fn from_inputs(inputs: &ScenarioInputs, is_primary: bool) -> Self {
        ScenarioSummary {
            scenario: inputs.scenario.clone(),
            results: inputs.calculate(),
            is_primary,
        }
    }
}

/// One row of the pursuit report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitReportRow {
    pub pursuit: Pursuit,
    pub stage: Option<PursuitStage>,
    pub scenarios: Vec<ScenarioSummary>,
}

impl PursuitReportRow {
    /// The scenario flagged primary, else the first one.
    pub fn primary_scenario(&self) -> Option<&ScenarioSummary> {
        self.scenarios
            .iter()
            .find(|s| s.is_primary)
            .or_else(|| self.scenarios.first())
    }

    fn metric(&self, pick: fn(&CalculationResults) -> f64) -> FieldValue {
        self.primary_scenario()
            .map(|s| FieldValue::Number(pick(&s.results)))
            .unwrap_or_default()
    }
}

// ============================================================================
// FIELD KEYS
// ============================================================================

/// Every reportable pursuit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PursuitField {
    Name,
    Region,
    City,
    State,
    ProductType,
    Stage,
    CreatedAt,
    IsArchived,
    SiteAreaAcres,
    ScenarioCount,
    TotalUnits,
    TotalNrsf,
    TotalBudget,
    CostPerUnit,
    LandCost,
    NetRevenue,
    TotalOpex,
    Noi,
    OpexRatio,
    YieldOnCost,
}

impl PursuitField {
    pub const ALL: [PursuitField; 20] = [
        PursuitField::Name,
        PursuitField::Region,
        PursuitField::City,
        PursuitField::State,
        PursuitField::ProductType,
        PursuitField::Stage,
        PursuitField::CreatedAt,
        PursuitField::IsArchived,
        PursuitField::SiteAreaAcres,
        PursuitField::ScenarioCount,
        PursuitField::TotalUnits,
        PursuitField::TotalNrsf,
        PursuitField::TotalBudget,
        PursuitField::CostPerUnit,
        PursuitField::LandCost,
        PursuitField::NetRevenue,
        PursuitField::TotalOpex,
        PursuitField::Noi,
        PursuitField::OpexRatio,
        PursuitField::YieldOnCost,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PursuitField::Name => "name",
            PursuitField::Region => "region",
            PursuitField::City => "city",
            PursuitField::State => "state",
            PursuitField::ProductType => "product_type",
            PursuitField::Stage => "stage",
            PursuitField::CreatedAt => "created_at",
            PursuitField::IsArchived => "is_archived",
            PursuitField::SiteAreaAcres => "site_area_acres",
            PursuitField::ScenarioCount => "scenario_count",
            PursuitField::TotalUnits => "total_units",
            PursuitField::TotalNrsf => "total_nrsf",
            PursuitField::TotalBudget => "total_budget",
            PursuitField::CostPerUnit => "cost_per_unit",
            PursuitField::LandCost => "land_cost",
            PursuitField::NetRevenue => "net_revenue",
            PursuitField::TotalOpex => "total_opex",
            PursuitField::Noi => "noi",
            PursuitField::OpexRatio => "opex_ratio",
            PursuitField::YieldOnCost => "yield_on_cost",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PursuitField::Name => "Pursuit",
            PursuitField::Region => "Region",
            PursuitField::City => "City",
            PursuitField::State => "State",
            PursuitField::ProductType => "Product Type",
            PursuitField::Stage => "Stage",
            PursuitField::CreatedAt => "Created",
            PursuitField::IsArchived => "Archived",
            PursuitField::SiteAreaAcres => "Site Acres",
            PursuitField::ScenarioCount => "Scenarios",
            PursuitField::TotalUnits => "Units",
            PursuitField::TotalNrsf => "NRSF",
            PursuitField::TotalBudget => "Total Budget",
            PursuitField::CostPerUnit => "Cost / Unit",
            PursuitField::LandCost => "Land Cost",
            PursuitField::NetRevenue => "Net Revenue",
            PursuitField::TotalOpex => "Total OpEx",
            PursuitField::Noi => "NOI",
            PursuitField::OpexRatio => "OpEx Ratio",
            PursuitField::YieldOnCost => "Yield on Cost",
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            PursuitField::Name
            | PursuitField::Region
            | PursuitField::City
            | PursuitField::State
            | PursuitField::ProductType
            | PursuitField::Stage => FieldType::Text,
            PursuitField::CreatedAt => FieldType::Date,
            PursuitField::IsArchived => FieldType::Boolean,
            PursuitField::SiteAreaAcres
            | PursuitField::ScenarioCount
            | PursuitField::TotalUnits
            | PursuitField::TotalNrsf => FieldType::Number,
            PursuitField::TotalBudget
            | PursuitField::CostPerUnit
            | PursuitField::LandCost
            | PursuitField::NetRevenue
            | PursuitField::TotalOpex
            | PursuitField::Noi => FieldType::Currency,
            PursuitField::OpexRatio | PursuitField::YieldOnCost => FieldType::Percent,
        }
    }

    /// Rollup override; per-unit amounts average instead of summing.
    pub fn aggregation(self) -> Option<AggregationMode> {
        match self {
            PursuitField::CostPerUnit => Some(AggregationMode::Avg),
            _ => None,
        }
    }

    /// Reads this field from a row.
    pub fn value(self, row: &PursuitReportRow) -> FieldValue {
        let pursuit = &row.pursuit;
        match self {
            PursuitField::Name => FieldValue::from(pursuit.name.as_str()),
            PursuitField::Region => pursuit.region.as_deref().into(),
            PursuitField::City => pursuit.city.as_deref().into(),
            PursuitField::State => pursuit.state.as_deref().into(),
            PursuitField::ProductType => pursuit.product_type.as_deref().into(),
            PursuitField::Stage => row.stage.as_ref().map(|s| s.name.as_str()).into(),
            PursuitField::CreatedAt => pursuit.created_at.as_deref().into(),
            PursuitField::IsArchived => pursuit.is_archived.into(),
            PursuitField::SiteAreaAcres => pursuit.site_area_sf.map(|sf| sf / SF_PER_ACRE).into(),
            PursuitField::ScenarioCount => (row.scenarios.len() as f64).into(),
            PursuitField::TotalUnits => row
                .primary_scenario()
                .and_then(|s| s.scenario.total_units)
                .into(),
            PursuitField::TotalNrsf => row.metric(|r| r.total_nrsf),
            PursuitField::TotalBudget => row.metric(|r| r.total_budget),
            PursuitField::CostPerUnit => row.metric(|r| r.cost_per_unit),
            PursuitField::LandCost => row.metric(|r| r.land_cost),
            PursuitField::NetRevenue => row.metric(|r| r.net_revenue),
            PursuitField::TotalOpex => row.metric(|r| r.total_opex),
            PursuitField::Noi => row.metric(|r| r.noi),
            PursuitField::OpexRatio => row.metric(|r| r.opex_ratio),
            PursuitField::YieldOnCost => row.metric(|r| r.unlevered_yield_on_cost),
        }
    }

    pub fn definition(self) -> FieldDefinition<PursuitReportRow> {
        let definition = FieldDefinition::new(
            self.label(),
            self.field_type(),
            move |row: &PursuitReportRow| self.value(row),
        );
        match self.aggregation() {
            Some(mode) => definition.with_aggregation(mode),
            None => definition,
        }
    }
}

impl FromStr for PursuitField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PursuitField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == s)
            .ok_or_else(|| ReportError::UnknownField(s.to_string()))
    }
}

/// Registry of every pursuit field, in `PursuitField::ALL` order.
pub fn pursuit_registry() -> FieldRegistry<PursuitReportRow> {
    let mut registry = FieldRegistry::new();
    for field in PursuitField::ALL {
        registry.register(field.key(), field.definition());
    }
    registry
}
