//! FILENAME: core/report-engine/src/view.rs
//! Report View - the output of the report engine.
//!
//! Holds the filtered/sorted rows, the group tree with per-node rollups, and
//! the grand totals. Rows are borrowed from the caller's input; nothing here
//! owns or mutates them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::definition::FieldKey;

/// Label used for rows whose group value is blank.
pub const EMPTY_GROUP_LABEL: &str = "(Empty)";

// ============================================================================
// AGGREGATES
// ============================================================================

/// Rollups over a row subset. `None` means no row had a value for the
/// field, which is distinct from values summing to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
    #[serde(rename = "_count")]
    pub count: usize,
    #[serde(flatten)]
    pub values: BTreeMap<FieldKey, Option<f64>>,
}

impl Aggregates {
    pub fn with_count(count: usize) -> Self {
        Aggregates {
            count,
            values: BTreeMap::new(),
        }
    }

    /// The aggregate for a field: `None` if the field was not aggregated,
    /// `Some(None)` if it was but no row had data.
    pub fn get(&self, key: &str) -> Option<Option<f64>> {
        self.values.get(key).copied()
    }

    /// The aggregate for a field, flattening "not aggregated" and "no data".
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).flatten()
    }
}

// ============================================================================
// GROUP TREE
// ============================================================================

/// One node of the group tree.
#[derive(Debug, Serialize)]
#[serde(bound(serialize = "R: Serialize"))]
pub struct GroupNode<'a, R> {
    /// Field the split was performed on.
    pub field: FieldKey,
    /// Group key (stringified value, or `(Empty)`).
    pub value: String,
    /// Display label.
    pub label: String,
    pub depth: usize,
    /// Next grouping level; empty at the deepest level.
    pub children: Vec<GroupNode<'a, R>>,
    /// Leaf rows; populated only at the deepest level.
    pub rows: Vec<&'a R>,
    pub aggregates: Aggregates,
}

impl<'a, R> GroupNode<'a, R> {
    pub fn row_count(&self) -> usize {
        self.aggregates.count
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Everything the report engine produces for one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase", bound(serialize = "R: Serialize"))]
pub struct ReportEngineResult<'a, R> {
    pub filtered_rows: Vec<&'a R>,
    pub group_tree: Vec<GroupNode<'a, R>>,
    pub total_aggregates: Aggregates,
    pub is_grouped: bool,
}

impl<'a, R> ReportEngineResult<'a, R> {
    /// The result for an empty input.
    pub fn empty() -> Self {
        ReportEngineResult {
            filtered_rows: Vec::new(),
            group_tree: Vec::new(),
            total_aggregates: Aggregates::with_count(0),
            is_grouped: false,
        }
    }

    /// Depth-first list of every group node with its depth, in display
    /// order. This is the order a table or export renders group headers.
    pub fn flatten_groups(&self) -> Vec<(usize, &GroupNode<'a, R>)> {
        let mut out = Vec::new();
        for node in &self.group_tree {
            flatten_into(node, &mut out);
        }
        out
    }

    /// Number of deepest-level groups.
    pub fn leaf_count(&self) -> usize {
        self.flatten_groups()
            .iter()
            .filter(|(_, node)| node.is_leaf())
            .count()
    }
}

fn flatten_into<'n, 'a, R>(node: &'n GroupNode<'a, R>, out: &mut Vec<(usize, &'n GroupNode<'a, R>)>) {
    out.push((node.depth, node));
    for child in &node.children {
        flatten_into(child, out);
    }
}
