//! FILENAME: core/persistence/src/import.rs
//! Builds pivot record sets from uploaded CSV text and JSON payloads.
//!
//! The CSV reader is deliberately simple: lines split on `\n`, fields split
//! on `,`, double quotes stripped. Quoted fields containing commas are not
//! supported.

use std::fs;
use std::path::Path;

use engine::{flatten_students, Record, RecordValue, StudentRecord};

use crate::PersistenceError;

/// Parses uploaded CSV text. The first non-blank line holds the headers.
/// Missing trailing values become empty text; extra values are ignored.
pub fn parse_csv_records(text: &str) -> Result<Vec<Record>, PersistenceError> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(PersistenceError::InvalidFormat(
            "CSV must have header and at least one data row.".to_string(),
        ));
    }

    let headers: Vec<String> = lines[0].split(',').map(clean_field).collect();

    let records: Vec<Record> = lines[1..]
        .iter()
        .map(|line| {
            let values: Vec<&str> = line.split(',').collect();
            let mut record = Record::new();
            for (i, header) in headers.iter().enumerate() {
                let value = values.get(i).map(|v| clean_field(v)).unwrap_or_default();
                record.set(header.clone(), RecordValue::Text(value));
            }
            record
        })
        .collect();

    if records.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Parsed CSV is empty.".to_string(),
        ));
    }

    log::info!(
        "parsed CSV upload: {} columns, {} rows",
        headers.len(),
        records.len()
    );
    Ok(records)
}

fn clean_field(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

/// Reads and parses a CSV file.
pub fn read_csv_file(path: &Path) -> Result<Vec<Record>, PersistenceError> {
    let text = fs::read_to_string(path)?;
    parse_csv_records(&text)
}

/// Parses a JSON array of flat objects.
pub fn parse_json_records(text: &str) -> Result<Vec<Record>, PersistenceError> {
    let records: Vec<Record> = serde_json::from_str(text)?;
    if records.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Parsed data is empty.".to_string(),
        ));
    }
    Ok(records)
}

/// Parses the record store's student list and flattens it to display records.
pub fn parse_student_records(text: &str) -> Result<Vec<Record>, PersistenceError> {
    let students: Vec<StudentRecord> = serde_json::from_str(text)?;
    if students.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "No system data available to load.".to_string(),
        ));
    }
    Ok(flatten_students(&students))
}
