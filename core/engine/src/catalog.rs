//! FILENAME: core/engine/src/catalog.rs
//! PURPOSE: Discovers the assignable fields of a record set.
//! CONTEXT: Fields are not declared ahead of time. The catalog is the key set
//! of the first record, which assumes the record set is homogeneous.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A field that can be assigned to a pivot area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as it appears in the records.
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

impl Field {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let label = field_label(&id);
        Field { id, label }
    }
}

/// Returns the fields of the first record, in record order.
/// An empty record set has an empty catalog.
pub fn field_catalog(records: &[Record]) -> Vec<Field> {
    match records.first() {
        Some(first) => first.field_names().map(Field::new).collect(),
        None => Vec::new(),
    }
}

/// Derives a display label by splitting a field name at capitalization
/// boundaries: "transportMode" -> "transport Mode", "HTTPServer" -> "HTTP Server".
pub fn field_label(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut label = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            let starts_word = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if starts_word {
                label.push(' ');
            }
        }
        label.push(c);
    }

    label.trim().to_string()
}
