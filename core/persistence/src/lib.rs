//! FILENAME: core/persistence/src/lib.rs
//! Persistence for the pivot engine.
//!
//! Handles the pivot layout across sessions and ingestion of record sets
//! from CSV uploads and JSON payloads.

mod error;
pub mod import;
pub mod layout;
pub mod store;

pub use error::PersistenceError;
pub use import::{parse_csv_records, parse_json_records, parse_student_records, read_csv_file};
pub use layout::{LayoutStore, LAYOUT_STORAGE_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
