//! FILENAME: core/report-engine/src/definition.rs
//! Report Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a report.
//! These structures are designed to be:
//! - Serializable (saved report presets, sent over the UI bridge)
//! - Tolerant of partial documents (every section defaults to empty)
//! - Immutable snapshots of user intent

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::registry::FieldRegistry;
use crate::value::FieldValue;

/// Key identifying a field in a registry.
pub type FieldKey = String;

// ============================================================================
// FIELD TYPES & AGGREGATION
// ============================================================================

/// Declared type of a registry field; drives default formatting and
/// aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Currency,
    Percent,
    Date,
    Boolean,
}

impl FieldType {
    /// Whether fields of this type take part in rollups.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Currency | FieldType::Percent)
    }

    /// Default rollup for the type: percentages average, amounts sum.
    pub fn default_aggregation(self) -> AggregationMode {
        match self {
            FieldType::Percent => AggregationMode::Avg,
            FieldType::Number | FieldType::Currency => AggregationMode::Sum,
            _ => AggregationMode::None,
        }
    }
}

/// How a numeric field is rolled up per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    Sum,
    Avg,
    None,
}

// ============================================================================
// FILTER DEFINITIONS
// ============================================================================

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Case-insensitive string equality.
    Equals,
    NotEquals,
    /// Case-insensitive substring.
    Contains,
    Gt,
    Lt,
    Gte,
    Lte,
    /// Any operator this version does not recognise; the filter is ignored.
    #[serde(other)]
    Unknown,
}

/// A single filter; all filters of a report are combined with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub field: FieldKey,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: FieldValue,
}

impl ReportFilter {
    pub fn new(field: &str, operator: FilterOperator, value: impl Into<FieldValue>) -> Self {
        ReportFilter {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }
}

// ============================================================================
// SORT DEFINITIONS
// ============================================================================

/// Sort direction for the flat row list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort field and direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: FieldKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: &str) -> Self {
        SortSpec {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        SortSpec {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The complete, serializable definition of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportConfig {
    /// Combined with AND, applied before sorting.
    pub filters: Vec<ReportFilter>,

    #[serde(alias = "sort_by")]
    pub sort_by: Option<SortSpec>,

    /// Ordered from outermost to innermost grouping level.
    #[serde(alias = "group_by")]
    pub group_by: Vec<FieldKey>,

    /// Columns shown by the rendering layer.
    pub columns: Vec<FieldKey>,
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a saved report configuration.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let config: ReportConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn with_filter(mut self, filter: ReportFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort_by = Some(sort);
        self
    }

    pub fn with_group_by(mut self, field: &str) -> Self {
        self.group_by.push(field.to_string());
        self
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Lists every field key referenced by this configuration that the
    /// registry does not know. The engine ignores such keys; this is for
    /// surfacing stale presets to the user.
    pub fn validate<R>(&self, registry: &FieldRegistry<R>) -> Vec<FieldKey> {
        let referenced = self
            .filters
            .iter()
            .map(|f| &f.field)
            .chain(self.sort_by.iter().map(|s| &s.field))
            .chain(self.group_by.iter())
            .chain(self.columns.iter());

        let mut unknown: Vec<FieldKey> = Vec::new();
        for key in referenced {
            if !registry.contains(key) && !unknown.contains(key) {
                unknown.push(key.clone());
            }
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_camel_case_json() {
        let config = ReportConfig::from_json(
            r#"{
                "filters": [{"field": "region", "operator": "equals", "value": "dfw"}],
                "sortBy": {"field": "name", "direction": "desc"},
                "groupBy": ["region", "stage"],
                "columns": ["name"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.filters[0].operator, FilterOperator::Equals);
        assert_eq!(config.sort_by, Some(SortSpec::desc("name")));
        assert_eq!(config.group_by, vec!["region", "stage"]);
    }

    #[test]
    fn test_config_accepts_snake_case_and_missing_sections() {
        let config = ReportConfig::from_json(r#"{"group_by": ["state"]}"#).unwrap();
        assert_eq!(config.group_by, vec!["state"]);
        assert!(config.filters.is_empty());
        assert!(config.sort_by.is_none());
    }

    #[test]
    fn test_unrecognised_operator_deserializes_as_unknown() {
        let filter: ReportFilter =
            serde_json::from_str(r#"{"field": "region", "operator": "between", "value": 3}"#).unwrap();
        assert_eq!(filter.operator, FilterOperator::Unknown);
    }

    #[test]
    fn test_missing_filter_value_is_empty() {
        let filter: ReportFilter =
            serde_json::from_str(r#"{"field": "region", "operator": "equals"}"#).unwrap();
        assert_eq!(filter.value, FieldValue::Empty);
    }

    #[test]
    fn test_sort_direction_defaults_to_ascending() {
        let sort: SortSpec = serde_json::from_str(r#"{"field": "name"}"#).unwrap();
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(
            ReportConfig::from_json(r#"{"filters": 3}"#),
            Err(ReportError::Json(_))
        ));
    }

    #[test]
    fn test_default_aggregation_by_type() {
        assert_eq!(FieldType::Percent.default_aggregation(), AggregationMode::Avg);
        assert_eq!(FieldType::Currency.default_aggregation(), AggregationMode::Sum);
        assert_eq!(FieldType::Number.default_aggregation(), AggregationMode::Sum);
        assert_eq!(FieldType::Text.default_aggregation(), AggregationMode::None);
        assert!(!FieldType::Date.is_numeric());
    }
}
