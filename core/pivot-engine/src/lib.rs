//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot aggregation engine.
//!
//! Cross-tabulates an in-memory set of flat records into a count/sum matrix
//! driven by a user-chosen `Layout`. Depends on `engine` for the record model.
//!
//! Layers:
//! - `definition`: Layout, areas and filter selections (what the pivot IS)
//! - `engine`: Filtering, composite keys and the matrix (HOW we calculate)
//! - `view`: Totals and the renderable table (WHAT we display)
//! - `export`: CSV serialization of the table

pub mod definition;
pub mod engine;
pub mod export;
pub mod view;

pub use definition::*;
pub use self::engine::{
    aggregate, axis_keys, calculate_pivot, composite_key, filter_options, filter_records, Cell,
    CellValues, Matrix, PivotCalculator, PivotResult, BLANK_KEY, KEY_SEPARATOR, TOTALS_KEY,
};
pub use export::{export_csv, export_filename, export_filename_today, EXPORT_FILE_PREFIX};
pub use view::{build_view, col_total, compute_totals, row_total, PivotView, PivotViewRow, Totals};
