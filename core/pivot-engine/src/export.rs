//! FILENAME: core/pivot-engine/src/export.rs
//! CSV export of a pivot pass, totals included.

use chrono::{NaiveDate, Utc};
use engine::format_number;

use crate::engine::PivotResult;
use crate::view::build_view;

/// Prefix of exported report file names.
pub const EXPORT_FILE_PREFIX: &str = "pivot_report_";

/// Serializes `result` to CSV text. The corner label names the fields the
/// result was keyed by.
///
/// The header row holds the quoted corner label, each column key and
/// `Total`. Each data row holds the quoted row key, the active-metric value
/// per column (empty where the cell is absent) and the row total. Lines are
/// joined by `\n` with no trailing newline.
///
/// Returns `None` when there are no row keys.
pub fn export_csv(result: &PivotResult) -> Option<String> {
    if result.row_keys.is_empty() {
        return None;
    }

    let view = build_view(result);
    let mut lines = Vec::with_capacity(view.rows.len() + 1);

    let mut header = vec![format!("\"{}\"", view.corner_label)];
    header.extend(view.col_keys.iter().map(|key| quote_if_needed(key)));
    header.push("Total".to_string());
    lines.push(header.join(","));

    for row in &view.rows {
        let mut line = vec![format!("\"{}\"", row.key)];
        line.extend(
            row.cells
                .iter()
                .map(|cell| cell.map(format_number).unwrap_or_default()),
        );
        line.push(format_number(row.total));
        lines.push(line.join(","));
    }

    Some(lines.join("\n"))
}

/// Quotes a field that would otherwise break the CSV row.
fn quote_if_needed(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// File name for a report exported on `date`: `pivot_report_YYYY-MM-DD.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("{}{}.csv", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// File name for a report exported today (UTC).
pub fn export_filename_today() -> String {
    export_filename(Utc::now().date_naive())
}
