//! FILENAME: core/engine/src/student.rs
//! PURPOSE: Flattens student entities from the record store into pivot records.
//! CONTEXT: The live entity store is loaded over HTTP by the host; this module
//! only knows the entity's JSON shape and the fixed set of display fields the
//! pivot engine sees.

use serde::{Deserialize, Serialize};

use crate::record::{format_number, Record, RecordValue};

/// Display fields produced by `StudentRecord::to_record`, in order.
pub const STUDENT_DISPLAY_FIELDS: [&str; 9] = [
    "Name",
    "Email",
    "Course",
    "GPA",
    "Status",
    "Country",
    "City",
    "Transport",
    "Category",
];

/// A student entity as served by the record store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub transport_mode: Option<String>,
    #[serde(default)]
    pub student_category: Option<String>,
}

impl StudentRecord {
    /// Flattens the entity to the display fields. GPA is stringified and
    /// reads "0" when missing.
    pub fn to_record(&self) -> Record {
        let gpa = match self.gpa {
            Some(g) if g != 0.0 => format_number(g),
            _ => "0".to_string(),
        };

        let values: [RecordValue; 9] = [
            RecordValue::text(self.name.clone()),
            RecordValue::text(self.email.clone()),
            self.course.clone().into(),
            RecordValue::text(gpa),
            self.status.clone().into(),
            self.country.clone().into(),
            self.city.clone().into(),
            self.transport_mode.clone().into(),
            self.student_category.clone().into(),
        ];

        Record::from_pairs(STUDENT_DISPLAY_FIELDS.iter().copied().zip(values))
    }
}

/// Flattens a slice of students.
pub fn flatten_students(students: &[StudentRecord]) -> Vec<Record> {
    students.iter().map(StudentRecord::to_record).collect()
}
