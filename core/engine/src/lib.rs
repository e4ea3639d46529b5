//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the record model.
//! CONTEXT: Re-exports the record types shared by the pivot engine and the
//! persistence layer.

pub mod catalog;
pub mod record;
pub mod student;

// Re-export commonly used types at the crate root
pub use catalog::{field_catalog, field_label, Field};
pub use record::{format_number, parse_leading_float, Record, RecordValue};
pub use student::{flatten_students, StudentRecord, STUDENT_DISPLAY_FIELDS};
