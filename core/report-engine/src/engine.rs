//! FILENAME: core/report-engine/src/engine.rs
//! Report Engine - turns rows plus a ReportConfig into a ReportEngineResult.
//!
//! This module takes a list of rows, a ReportConfig (filters, sort, group-by)
//! and a FieldRegistry (how to read each field) and produces the filtered
//! row list, the group tree and the grand totals.
//!
//! Algorithm:
//! 1. Filter: every filter must pass (AND); unknown fields/operators are no-ops
//! 2. Sort: stable sort on one field, blanks always last
//! 3. Group: recursive partition per group-by field, keys in alphabetical order
//! 4. Aggregate: sum/avg of every numeric registry field, per node and overall

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::definition::{
    AggregationMode, FieldKey, FilterOperator, ReportConfig, ReportFilter, SortDirection,
};
use crate::registry::{FieldDefinition, FieldRegistry};
use crate::value::{compare_values, locale_compare, FieldValue};
use crate::view::{Aggregates, GroupNode, ReportEngineResult, EMPTY_GROUP_LABEL};

/// A group-by level resolved against the registry.
type GroupLevel<'r, R> = (&'r str, &'r FieldDefinition<R>);

// ============================================================================
// FILTERING
// ============================================================================

/// Tests a row value against one filter. Unknown operators pass.
pub fn matches_filter(value: &FieldValue, filter: &ReportFilter) -> bool {
    match filter.operator {
        FilterOperator::Equals => text_key(value) == text_key(&filter.value),
        FilterOperator::NotEquals => text_key(value) != text_key(&filter.value),
        FilterOperator::Contains => text_key(value).contains(&text_key(&filter.value)),
        // NaN on either side compares false, so the row is dropped.
        FilterOperator::Gt => value.to_number() > filter.value.to_number(),
        FilterOperator::Lt => value.to_number() < filter.value.to_number(),
        FilterOperator::Gte => value.to_number() >= filter.value.to_number(),
        FilterOperator::Lte => value.to_number() <= filter.value.to_number(),
        FilterOperator::Unknown => true,
    }
}

fn text_key(value: &FieldValue) -> String {
    value.to_display_string().to_lowercase()
}

// ============================================================================
// SORTING
// ============================================================================

/// Orders two values for the row sort. Blanks go last in both directions.
pub fn compare_for_sort(a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
    match (a.is_blank(), b.is_blank()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = compare_values(a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Computes the rollups of every aggregatable registry field over `rows`.
pub fn compute_aggregates<R>(rows: &[&R], registry: &FieldRegistry<R>) -> Aggregates {
    let mut aggregates = Aggregates::with_count(rows.len());

    for (key, definition) in registry.iter() {
        let mode = definition.effective_aggregation();
        if mode == AggregationMode::None {
            continue;
        }

        let mut sum = 0.0;
        let mut present = 0usize;
        for row in rows {
            if let Some(n) = definition.value(row).as_aggregate_input() {
                sum += n;
                present += 1;
            }
        }

        let value = if present == 0 {
            None
        } else {
            match mode {
                AggregationMode::Avg => Some(sum / present as f64),
                _ => Some(sum),
            }
        };
        aggregates.values.insert(key.to_string(), value);
    }

    aggregates
}

// ============================================================================
// REPORT CALCULATOR
// ============================================================================

/// The main calculation engine for reports.
pub struct ReportCalculator<'a, 'r, R> {
    rows: &'a [R],
    config: &'r ReportConfig,
    registry: &'r FieldRegistry<R>,
}

impl<'a, 'r, R> ReportCalculator<'a, 'r, R> {
    pub fn new(rows: &'a [R], config: &'r ReportConfig, registry: &'r FieldRegistry<R>) -> Self {
        ReportCalculator {
            rows,
            config,
            registry,
        }
    }

    /// Executes the full pipeline.
    pub fn calculate(&self) -> ReportEngineResult<'a, R> {
        if self.rows.is_empty() {
            return ReportEngineResult::empty();
        }

        // Step 1: Filter
        let mut filtered = self.apply_filters();

        // Step 2: Sort
        self.apply_sort(&mut filtered);

        // Step 3: Group (aggregates per node)
        let levels = self.resolve_group_levels();
        let is_grouped = !levels.is_empty();
        let group_tree = if is_grouped {
            self.build_groups(&filtered, &levels, 0)
        } else {
            Vec::new()
        };

        // Step 4: Grand totals
        let total_aggregates = compute_aggregates(&filtered, self.registry);

        log::debug!(
            "run_report_engine: rows={} filtered={} groups={} grouped={}",
            self.rows.len(),
            filtered.len(),
            group_tree.len(),
            is_grouped
        );

        ReportEngineResult {
            filtered_rows: filtered,
            group_tree,
            total_aggregates,
            is_grouped,
        }
    }

    /// Applies every filter whose field is known.
    fn apply_filters(&self) -> Vec<&'a R> {
        let active: Vec<(&ReportFilter, &FieldDefinition<R>)> = self
            .config
            .filters
            .iter()
            .filter_map(|filter| match self.registry.get(&filter.field) {
                Some(definition) => Some((filter, definition)),
                None => {
                    log::trace!("report filter skipped, unknown field '{}'", filter.field);
                    None
                }
            })
            .collect();

        self.rows
            .iter()
            .filter(|row| {
                active
                    .iter()
                    .all(|(filter, definition)| matches_filter(&definition.value(row), filter))
            })
            .collect()
    }

    /// Stable-sorts the rows on the configured sort field.
    fn apply_sort(&self, rows: &mut Vec<&'a R>) {
        let Some(sort) = &self.config.sort_by else {
            return;
        };
        let Some(definition) = self.registry.get(&sort.field) else {
            log::trace!("report sort skipped, unknown field '{}'", sort.field);
            return;
        };

        // Read each value once, then sort the (value, row) pairs.
        let mut keyed: Vec<(FieldValue, &'a R)> = rows
            .iter()
            .map(|row| (definition.value(row), *row))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| compare_for_sort(a, b, sort.direction));

        *rows = keyed.into_iter().map(|(_, row)| row).collect();
    }

    /// Resolves group-by keys against the registry, dropping unknown keys.
    fn resolve_group_levels(&self) -> SmallVec<[GroupLevel<'r, R>; 4]> {
        self.config
            .group_by
            .iter()
            .filter_map(|key: &'r FieldKey| match self.registry.get(key) {
                Some(definition) => Some((key.as_str(), definition)),
                None => {
                    log::trace!("report group-by skipped, unknown field '{}'", key);
                    None
                }
            })
            .collect()
    }

    /// Recursively builds one level of the group tree.
    fn build_groups(
        &self,
        rows: &[&'a R],
        levels: &[GroupLevel<'r, R>],
        depth: usize,
    ) -> Vec<GroupNode<'a, R>> {
        let Some((&(field, definition), remaining)) = levels.split_first() else {
            return Vec::new();
        };

        // Partition preserving the (sorted) row order inside each group.
        let mut partitions: Vec<(String, FieldValue, Vec<&'a R>)> = Vec::new();
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();
        for row in rows {
            let value = definition.value(row);
            let key = group_key(&value);
            match positions.get(&key) {
                Some(&position) => partitions[position].2.push(*row),
                None => {
                    positions.insert(key.clone(), partitions.len());
                    partitions.push((key, value, vec![*row]));
                }
            }
        }

        partitions.sort_by(|(a, _, _), (b, _, _)| locale_compare(a, b));

        partitions
            .into_iter()
            .map(|(key, value, subset)| {
                let label = if value.is_blank() {
                    EMPTY_GROUP_LABEL.to_string()
                } else {
                    definition.format(&value)
                };
                let aggregates = compute_aggregates(&subset, self.registry);
                let (children, rows) = if remaining.is_empty() {
                    (Vec::new(), subset)
                } else {
                    (self.build_groups(&subset, remaining, depth + 1), Vec::new())
                };

                GroupNode {
                    field: field.to_string(),
                    value: key,
                    label,
                    depth,
                    children,
                    rows,
                    aggregates,
                }
            })
            .collect()
    }
}

/// The group key of a value: its string form, or `(Empty)` when blank.
pub fn group_key(value: &FieldValue) -> String {
    if value.is_blank() {
        EMPTY_GROUP_LABEL.to_string()
    } else {
        value.to_display_string()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Runs filter, sort, group and aggregate over `rows`.
/// This is the main entry point for the report engine. It never fails:
/// unknown fields and operators are ignored.
pub fn run_report_engine<'a, R>(
    rows: &'a [R],
    config: &ReportConfig,
    registry: &FieldRegistry<R>,
) -> ReportEngineResult<'a, R> {
    ReportCalculator::new(rows, config, registry).calculate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{FieldType, SortSpec};

    #[derive(Debug)]
    struct Row {
        region: Option<&'static str>,
        units: Option<f64>,
        yoc: Option<f64>,
    }

    fn row(region: Option<&'static str>, units: Option<f64>, yoc: Option<f64>) -> Row {
        Row { region, units, yoc }
    }

    fn registry() -> FieldRegistry<Row> {
        FieldRegistry::new()
            .with_field(
                "region",
                FieldDefinition::new("Region", FieldType::Text, |r: &Row| r.region.into()),
            )
            .with_field(
                "units",
                FieldDefinition::new("Units", FieldType::Number, |r: &Row| r.units.into()),
            )
            .with_field(
                "yoc",
                FieldDefinition::new("YoC", FieldType::Percent, |r: &Row| r.yoc.into()),
            )
    }

    #[test]
    fn test_matches_filter_operators() {
        let dfw = FieldValue::from("DFW");
        assert!(matches_filter(&dfw, &ReportFilter::new("region", FilterOperator::Equals, "dfw")));
        assert!(!matches_filter(&dfw, &ReportFilter::new("region", FilterOperator::NotEquals, "Dfw")));
        assert!(matches_filter(&dfw, &ReportFilter::new("region", FilterOperator::Contains, "f")));

        let ten = FieldValue::Number(10.0);
        assert!(matches_filter(&ten, &ReportFilter::new("units", FilterOperator::Gt, 5.0)));
        assert!(matches_filter(&ten, &ReportFilter::new("units", FilterOperator::Gte, "10")));
        assert!(matches_filter(&ten, &ReportFilter::new("units", FilterOperator::Lte, 10.0)));
        assert!(!matches_filter(&ten, &ReportFilter::new("units", FilterOperator::Lt, 10.0)));
        assert!(matches_filter(&ten, &ReportFilter::new("units", FilterOperator::Unknown, 0.0)));
    }

    #[test]
    fn test_numeric_filters_coerce_like_number() {
        // Empty coerces to 0.
        assert!(matches_filter(&FieldValue::Empty, &ReportFilter::new("units", FilterOperator::Lt, 1.0)));
        // Unparseable text is NaN and fails every comparison.
        let text = FieldValue::from("n/a");
        assert!(!matches_filter(&text, &ReportFilter::new("units", FilterOperator::Gt, -1.0)));
        assert!(!matches_filter(&text, &ReportFilter::new("units", FilterOperator::Lte, 1e9)));
    }

    #[test]
    fn test_compare_for_sort_puts_blanks_last_both_ways() {
        let blank = FieldValue::Empty;
        let one = FieldValue::Number(1.0);
        assert_eq!(compare_for_sort(&blank, &one, SortDirection::Asc), Ordering::Greater);
        assert_eq!(compare_for_sort(&blank, &one, SortDirection::Desc), Ordering::Greater);
        assert_eq!(compare_for_sort(&one, &blank, SortDirection::Desc), Ordering::Less);
    }

    #[test]
    fn test_sort_is_stable_and_numeric() {
        let rows = vec![
            row(Some("A"), Some(10.0), None),
            row(Some("B"), None, None),
            row(Some("C"), Some(9.0), None),
            row(Some("D"), Some(10.0), None),
        ];
        let config = ReportConfig::new().with_sort(SortSpec::desc("units"));
        let result = run_report_engine(&rows, &config, &registry());
        let order: Vec<_> = result.filtered_rows.iter().map(|r| r.region.unwrap()).collect();
        assert_eq!(order, vec!["A", "D", "C", "B"]);
    }

    #[test]
    fn test_aggregates_sum_and_average() {
        let rows = vec![
            row(Some("DFW"), Some(100.0), Some(0.06)),
            row(Some("DFW"), Some(50.0), None),
            row(Some("DFW"), None, Some(0.08)),
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let aggregates = compute_aggregates(&refs, &registry());

        assert_eq!(aggregates.count, 3);
        assert_eq!(aggregates.number("units"), Some(150.0));
        assert!((aggregates.number("yoc").unwrap() - 0.07).abs() < 1e-12);
        assert_eq!(aggregates.get("region"), None);
    }

    #[test]
    fn test_aggregate_none_override_excludes_field() {
        let registry = registry().with_field(
            "units",
            FieldDefinition::new("Units", FieldType::Number, |r: &Row| r.units.into())
                .with_aggregation(AggregationMode::None),
        );
        let rows = vec![row(None, Some(1.0), None)];
        let refs: Vec<&Row> = rows.iter().collect();
        let aggregates = compute_aggregates(&refs, &registry);
        assert_eq!(aggregates.get("units"), None);
        assert_eq!(aggregates.get("yoc"), Some(None));
    }

    #[test]
    fn test_blank_group_values_use_empty_label() {
        let rows = vec![row(None, Some(1.0), None), row(Some(""), Some(2.0), None), row(Some("ATX"), None, None)];
        let config = ReportConfig::new().with_group_by("region");
        let result = run_report_engine(&rows, &config, &registry());

        let labels: Vec<_> = result.group_tree.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["(Empty)", "ATX"]);
        assert_eq!(result.group_tree[0].row_count(), 2);
        assert_eq!(result.group_tree[0].aggregates.number("units"), Some(3.0));
    }

    #[test]
    fn test_unknown_group_field_is_ignored() {
        let rows = vec![row(Some("DFW"), Some(1.0), None)];
        let config = ReportConfig::new().with_group_by("bogus");
        let result = run_report_engine(&rows, &config, &registry());
        assert!(!result.is_grouped);
        assert!(result.group_tree.is_empty());
        assert_eq!(result.filtered_rows.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<Row> = Vec::new();
        let config = ReportConfig::new().with_group_by("region");
        let result = run_report_engine(&rows, &config, &registry());
        assert!(result.filtered_rows.is_empty());
        assert!(result.group_tree.is_empty());
        assert!(!result.is_grouped);
        assert_eq!(result.total_aggregates, Aggregates::with_count(0));
    }
}
