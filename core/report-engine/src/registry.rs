//! FILENAME: core/report-engine/src/registry.rs
//! Field Registry - how the engine reads, formats and rolls up a field.
//!
//! The engine is generic over the row type. Everything it knows about a
//! field comes from a `FieldDefinition`: its declared type, an accessor that
//! pulls a `FieldValue` out of a row, an optional formatter, and an optional
//! aggregation override. A `FieldRegistry` is the ordered set of definitions
//! available to one kind of report.

use rustc_hash::FxHashMap;

use engine::number_format::{format_number, presets, MISSING_VALUE};

use crate::definition::{AggregationMode, FieldKey, FieldType};
use crate::value::FieldValue;

/// Reads a field out of a row.
pub type Accessor<R> = Box<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// Renders a field value for display.
pub type Formatter = Box<dyn Fn(&FieldValue) -> String + Send + Sync>;

// ============================================================================
// FIELD DEFINITION
// ============================================================================

/// Describes one reportable field of row type `R`.
pub struct FieldDefinition<R> {
    /// Column header.
    pub label: String,
    pub field_type: FieldType,
    /// Overrides the type's default rollup when set.
    pub aggregation: Option<AggregationMode>,
    accessor: Accessor<R>,
    formatter: Option<Formatter>,
}

impl<R> FieldDefinition<R> {
    pub fn new<F>(label: &str, field_type: FieldType, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        FieldDefinition {
            label: label.to_string(),
            field_type,
            aggregation: None,
            accessor: Box::new(accessor),
            formatter: None,
        }
    }

    pub fn with_aggregation(mut self, mode: AggregationMode) -> Self {
        self.aggregation = Some(mode);
        self
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&FieldValue) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Reads this field from a row.
    pub fn value(&self, row: &R) -> FieldValue {
        (self.accessor)(row)
    }

    /// Formats a value of this field for display.
    pub fn format(&self, value: &FieldValue) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => default_format(self.field_type, value),
        }
    }

    /// Reads and formats this field from a row.
    pub fn display(&self, row: &R) -> String {
        self.format(&self.value(row))
    }

    /// The rollup applied to this field. Non-numeric fields never roll up,
    /// whatever their override says.
    pub fn effective_aggregation(&self) -> AggregationMode {
        if !self.field_type.is_numeric() {
            return AggregationMode::None;
        }
        self.aggregation
            .unwrap_or_else(|| self.field_type.default_aggregation())
    }
}

impl<R> std::fmt::Debug for FieldDefinition<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("label", &self.label)
            .field("field_type", &self.field_type)
            .field("aggregation", &self.aggregation)
            .field("custom_formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Type-driven formatting used when a field has no formatter of its own.
pub fn default_format(field_type: FieldType, value: &FieldValue) -> String {
    if value.is_blank() {
        return MISSING_VALUE.to_string();
    }
    match field_type {
        FieldType::Number => {
            let n = value.to_number();
            let decimals = if n.fract() == 0.0 { 0 } else { 2 };
            format_number(n, &presets::number(decimals))
        }
        FieldType::Currency => format_number(value.to_number(), &presets::currency(0)),
        FieldType::Percent => format_number(value.to_number(), &presets::percentage(2)),
        FieldType::Boolean => match value {
            FieldValue::Boolean(true) => "Yes".to_string(),
            FieldValue::Boolean(false) => "No".to_string(),
            other => other.to_display_string(),
        },
        FieldType::Text | FieldType::Date => value.to_display_string(),
    }
}

// ============================================================================
// FIELD REGISTRY
// ============================================================================

/// Ordered map from field key to definition.
pub struct FieldRegistry<R> {
    entries: Vec<(FieldKey, FieldDefinition<R>)>,
    index: FxHashMap<FieldKey, usize>,
}

impl<R> FieldRegistry<R> {
    pub fn new() -> Self {
        FieldRegistry {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Adds a field. Re-registering a key replaces the definition in place.
    pub fn register(&mut self, key: &str, definition: FieldDefinition<R>) -> &mut Self {
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 = definition,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), definition));
            }
        }
        self
    }

    /// Builder form of `register`.
    pub fn with_field(mut self, key: &str, definition: FieldDefinition<R>) -> Self {
        self.register(key, definition);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldDefinition<R>> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// (key, definition) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition<R>)> {
        self.entries.iter().map(|(key, def)| (key.as_str(), def))
    }

    /// Headers for the requested columns; unknown keys are skipped.
    pub fn column_headers(&self, columns: &[FieldKey]) -> Vec<String> {
        columns
            .iter()
            .filter_map(|key| self.get(key))
            .map(|def| def.label.clone())
            .collect()
    }

    /// Formatted cells of one row for the requested columns; unknown keys
    /// are skipped so the result lines up with `column_headers`.
    pub fn format_row(&self, row: &R, columns: &[FieldKey]) -> Vec<String> {
        columns
            .iter()
            .filter_map(|key| self.get(key))
            .map(|def| def.display(row))
            .collect()
    }
}

impl<R> Default for FieldRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for FieldRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, def)| (key, def)))
            .finish()
    }
}
