//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns records into a matrix.
//!
//! This module takes a record set, a `Layout` and `FilterSelections` and
//! produces a `PivotResult` (row keys, column keys and the cell matrix).
//!
//! Algorithm:
//! 1. Filter: keep records matching every active filter selection
//! 2. Build composite row/column keys from the filtered records
//! 3. Cross-tabulate: bucket each record into its (row, column) cell,
//!    counting it and summing the first value field
//!
//! Every pass recomputes from scratch and is deterministic for identical
//! inputs.

use engine::{Record, RecordValue};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::definition::{ActiveMetric, FilterSelections, Layout};

/// Key part used for absent or empty field values.
pub const BLANK_KEY: &str = "(Blank)";

/// The single key used when an axis has no fields.
pub const TOTALS_KEY: &str = "Totals";

/// Separator between the parts of a composite key.
pub const KEY_SEPARATOR: &str = " :: ";

// ============================================================================
// CELLS AND MATRIX
// ============================================================================

/// Raw numeric values collected by a cell. Unparseable values are kept as
/// `None`.
pub type CellValues = SmallVec<[Option<f64>; 4]>;

/// Aggregates for one (row key, column key) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Number of records mapped to this cell.
    pub count: u64,
    /// Sum of the parseable values of the first value field.
    pub sum: f64,
    /// Every collected value, `None` for unparseable ones.
    pub values: CellValues,
}

impl Cell {
    /// Counts a record without a value contribution.
    fn add_record(&mut self) {
        self.count += 1;
    }

    /// Records a value field contribution. `None` means "not a number".
    fn add_value(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
        }
        self.values.push(value);
    }

    /// The displayed aggregate under `metric`.
    pub fn metric_value(&self, metric: ActiveMetric) -> f64 {
        match metric {
            ActiveMetric::Count => self.count as f64,
            ActiveMetric::Sum => self.sum,
        }
    }
}

/// Row key -> column key -> cell. Cells exist only for pairs with records.
pub type Matrix = FxHashMap<String, FxHashMap<String, Cell>>;

/// Output of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotResult {
    /// Distinct row keys, sorted ascending.
    pub row_keys: Vec<String>,
    /// Distinct column keys, sorted ascending.
    pub col_keys: Vec<String>,
    pub matrix: Matrix,
    /// Metric chosen once for this pass.
    pub metric: ActiveMetric,
    /// Number of records that survived filtering.
    pub record_count: usize,
    /// Fields the row keys were built from, in join order.
    pub row_fields: Vec<String>,
    /// Fields the column keys were built from, in join order.
    pub col_fields: Vec<String>,
}

impl PivotResult {
    pub fn cell(&self, row_key: &str, col_key: &str) -> Option<&Cell> {
        self.matrix.get(row_key).and_then(|row| row.get(col_key))
    }

    /// Active-metric value of a cell, `None` when the cell is absent.
    pub fn cell_value(&self, row_key: &str, col_key: &str) -> Option<f64> {
        self.cell(row_key, col_key)
            .map(|cell| cell.metric_value(self.metric))
    }

    /// Label of the table's top-left cell: "rows \ cols".
    pub fn corner_label(&self) -> String {
        format!(
            "{} \\ {}",
            self.row_fields.join(" / "),
            self.col_fields.join(" / ")
        )
    }
}

// ============================================================================
// FILTERING
// ============================================================================

/// Keeps the records that match every active selection among `filters`.
/// Values are compared by their string form.
pub fn filter_records<'a>(
    records: &'a [Record],
    filters: &[String],
    selections: &FilterSelections,
) -> Vec<&'a Record> {
    let active: Vec<(&str, &str)> = filters
        .iter()
        .filter_map(|field| {
            selections
                .active_value(field)
                .map(|value| (field.as_str(), value))
        })
        .collect();

    records
        .iter()
        .filter(|record| {
            active.iter().all(|(field, selected)| match record.get(field) {
                Some(RecordValue::Empty) | None => false,
                Some(value) => value.to_display_string() == *selected,
            })
        })
        .collect()
}

/// Sorted distinct values of `field` across `records`, for filter selectors.
/// Absent values are not listed.
pub fn filter_options(records: &[Record], field: &str) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for record in records {
        match record.get(field) {
            Some(RecordValue::Empty) | None => {}
            Some(value) => {
                seen.insert(value.to_display_string());
            }
        }
    }
    let mut options: Vec<String> = seen.into_iter().collect();
    options.sort();
    options
}

// ============================================================================
// COMPOSITE KEYS
// ============================================================================

/// Joins the record's values for `fields` with `KEY_SEPARATOR`.
/// Blank values read as `(Blank)`; no fields gives `Totals`.
pub fn composite_key(record: &Record, fields: &[String]) -> String {
    if fields.is_empty() {
        return TOTALS_KEY.to_string();
    }

    let mut key = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            key.push_str(KEY_SEPARATOR);
        }
        let value = record.value(field);
        if value.is_blank() {
            key.push_str(BLANK_KEY);
        } else {
            key.push_str(&value.to_display_string());
        }
    }
    key
}

/// Distinct composite keys of `records`, sorted ascending.
/// No fields always yields `["Totals"]`, even for an empty record set.
pub fn axis_keys(records: &[&Record], fields: &[String]) -> Vec<String> {
    if fields.is_empty() {
        return vec![TOTALS_KEY.to_string()];
    }

    let unique: FxHashSet<String> = records
        .iter()
        .map(|record| composite_key(record, fields))
        .collect();
    let mut keys: Vec<String> = unique.into_iter().collect();
    keys.sort();
    keys
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// Runs one aggregation pass over a record set.
pub struct PivotCalculator<'a> {
    records: &'a [Record],
    layout: &'a Layout,
    selections: &'a FilterSelections,
}

impl<'a> PivotCalculator<'a> {
    /// Creates a new calculator instance.
    pub fn new(
        records: &'a [Record],
        layout: &'a Layout,
        selections: &'a FilterSelections,
    ) -> Self {
        PivotCalculator {
            records,
            layout,
            selections,
        }
    }

    /// Executes the full calculation.
    pub fn calculate(&self) -> PivotResult {
        aggregate(
            self.records,
            self.layout.rows(),
            self.layout.cols(),
            self.layout.values(),
            self.layout.filters(),
            self.selections,
        )
    }
}

/// Aggregates `records` over explicit field lists.
///
/// This is the layout-free form of `PivotCalculator::calculate`; it does not
/// require the field lists to be disjoint.
pub fn aggregate(
    records: &[Record],
    rows: &[String],
    cols: &[String],
    values: &[String],
    filters: &[String],
    selections: &FilterSelections,
) -> PivotResult {
    // Step 1: Filter
    let filtered = filter_records(records, filters, selections);

    // Step 2: Axis keys
    let row_keys = axis_keys(&filtered, rows);
    let col_keys = axis_keys(&filtered, cols);

    // Step 3: Cross-tabulate
    let value_field = values.first();
    let mut matrix = Matrix::default();

    for record in &filtered {
        let cell = matrix
            .entry(composite_key(record, rows))
            .or_default()
            .entry(composite_key(record, cols))
            .or_default();

        cell.add_record();
        if let Some(field) = value_field {
            cell.add_value(record.value(field).as_number());
        }
    }

    log::debug!(
        "pivot pass: {} of {} records, {} rows x {} cols",
        filtered.len(),
        records.len(),
        row_keys.len(),
        col_keys.len()
    );

    PivotResult {
        row_keys,
        col_keys,
        matrix,
        metric: ActiveMetric::for_values(values),
        record_count: filtered.len(),
        row_fields: rows.to_vec(),
        col_fields: cols.to_vec(),
    }
}

/// Convenience wrapper around `PivotCalculator`.
pub fn calculate_pivot(
    records: &[Record],
    layout: &Layout,
    selections: &FilterSelections,
) -> PivotResult {
    PivotCalculator::new(records, layout, selections).calculate()
}
