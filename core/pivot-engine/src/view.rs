//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Grand totals and the renderable table.
//!
//! Totals follow the metric fixed on the `PivotResult` for the pass, so
//! cells and totals always agree on count vs. sum. Missing cells contribute 0.

use serde::{Deserialize, Serialize};

use crate::definition::ActiveMetric;
use crate::engine::PivotResult;

// ============================================================================
// TOTALS
// ============================================================================

/// Grand totals of a pivot pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// One entry per row key, in row key order.
    pub row_totals: Vec<f64>,
    /// One entry per column key, in column key order.
    pub col_totals: Vec<f64>,
    pub grand_total: f64,
}

/// Sum of the active metric across `row_key`'s cells.
pub fn row_total(result: &PivotResult, row_key: &str) -> f64 {
    result
        .col_keys
        .iter()
        .filter_map(|col_key| result.cell_value(row_key, col_key))
        .sum()
}

/// Sum of the active metric down `col_key`'s cells.
pub fn col_total(result: &PivotResult, col_key: &str) -> f64 {
    result
        .row_keys
        .iter()
        .filter_map(|row_key| result.cell_value(row_key, col_key))
        .sum()
}

/// Computes every row total, column total and the grand total.
pub fn compute_totals(result: &PivotResult) -> Totals {
    let row_totals: Vec<f64> = result
        .row_keys
        .iter()
        .map(|row_key| row_total(result, row_key))
        .collect();
    let col_totals: Vec<f64> = result
        .col_keys
        .iter()
        .map(|col_key| col_total(result, col_key))
        .collect();
    let grand_total = row_totals.iter().sum();

    Totals {
        row_totals,
        col_totals,
        grand_total,
    }
}

// ============================================================================
// VIEW
// ============================================================================

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotViewRow {
    pub key: String,
    /// Active-metric value per column key; `None` where no records fell.
    pub cells: Vec<Option<f64>>,
    pub total: f64,
}

/// Renderer-facing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotView {
    pub corner_label: String,
    pub col_keys: Vec<String>,
    pub rows: Vec<PivotViewRow>,
    pub col_totals: Vec<f64>,
    pub grand_total: f64,
    pub metric: ActiveMetric,
}

impl PivotView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the table for `result`.
pub fn build_view(result: &PivotResult) -> PivotView {
    let totals = compute_totals(result);

    let rows = result
        .row_keys
        .iter()
        .zip(&totals.row_totals)
        .map(|(row_key, &total)| PivotViewRow {
            key: row_key.clone(),
            cells: result
                .col_keys
                .iter()
                .map(|col_key| result.cell_value(row_key, col_key))
                .collect(),
            total,
        })
        .collect();

    PivotView {
        corner_label: result.corner_label(),
        col_keys: result.col_keys.clone(),
        rows,
        col_totals: totals.col_totals,
        grand_total: totals.grand_total,
        metric: result.metric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{FilterSelections, Layout};
    use crate::engine::{calculate_pivot, TOTALS_KEY};
    use engine::{Record, RecordValue};

    fn create_test_records() -> Vec<Record> {
        vec![
            record("A", "X", 10.0),
            record("A", "Y", 20.0),
            record("B", "X", 30.0),
        ]
    }

    fn record(row: &str, col: &str, value: f64) -> Record {
        Record::from_pairs([
            ("R", RecordValue::text(row)),
            ("C", RecordValue::text(col)),
            ("V", RecordValue::Number(value)),
        ])
    }

    #[test]
    fn test_sum_totals() {
        let records = create_test_records();
        let layout = Layout::from_areas(vec!["R"], vec!["C"], vec!["V"], vec![]);
        let result = calculate_pivot(&records, &layout, &FilterSelections::new());

        let totals = compute_totals(&result);
        assert_eq!(totals.row_totals, vec![30.0, 30.0]);
        assert_eq!(totals.col_totals, vec![40.0, 20.0]);
        assert_eq!(totals.grand_total, 60.0);
        assert_eq!(row_total(&result, "B"), 30.0);
        assert_eq!(col_total(&result, "Y"), 20.0);
    }

    #[test]
    fn test_count_totals_without_value_fields() {
        let records = create_test_records();
        let layout = Layout::from_areas(vec!["R"], vec!["C"], vec![], vec![]);
        let result = calculate_pivot(&records, &layout, &FilterSelections::new());

        let totals = compute_totals(&result);
        assert_eq!(totals.row_totals, vec![2.0, 1.0]);
        assert_eq!(totals.grand_total, 3.0);
    }

    #[test]
    fn test_view_marks_missing_cells() {
        let records = create_test_records();
        let layout = Layout::from_areas(vec!["R"], vec!["C"], vec!["V"], vec![]);
        let result = calculate_pivot(&records, &layout, &FilterSelections::new());

        let view = build_view(&result);
        assert_eq!(view.corner_label, "R \\ C");
        assert_eq!(view.col_keys, vec!["X", "Y"]);
        assert_eq!(view.rows[1].key, "B");
        assert_eq!(view.rows[1].cells, vec![Some(30.0), None]);
        assert_eq!(view.rows[1].total, 30.0);
        assert_eq!(view.metric, ActiveMetric::Sum);
    }

    #[test]
    fn test_empty_layout_view() {
        let layout = Layout::new();
        let result = calculate_pivot(&[], &layout, &FilterSelections::new());

        let view = build_view(&result);
        assert_eq!(view.corner_label, " \\ ");
        assert_eq!(view.col_keys, vec![TOTALS_KEY]);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].cells, vec![None]);
        assert_eq!(view.grand_total, 0.0);
    }
}
