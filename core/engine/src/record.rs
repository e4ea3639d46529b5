//! FILENAME: core/engine/src/record.rs
//! PURPOSE: Defines the flat record model the pivot engine aggregates over.
//! CONTEXT: A `Record` is an insertion-ordered mapping from field name to a
//! scalar `RecordValue`. No schema is declared; fields are discovered from the
//! data and may be missing on any individual record.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single scalar value held by a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    /// Missing or null.
    Empty,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl RecordValue {
    pub fn text(s: impl Into<String>) -> Self {
        RecordValue::Text(s.into())
    }

    /// True for values that bucket under the blank sentinel.
    pub fn is_blank(&self) -> bool {
        match self {
            RecordValue::Empty => true,
            RecordValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// String coercion used for filter comparison and key building.
    pub fn to_display_string(&self) -> String {
        match self {
            RecordValue::Empty => String::new(),
            RecordValue::Boolean(b) => b.to_string(),
            RecordValue::Number(n) => format_number(*n),
            RecordValue::Text(s) => s.clone(),
        }
    }

    /// Lenient numeric coercion. Text is parsed by its leading numeric prefix
    /// ("12kg" -> 12); empty text, booleans and `Empty` are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RecordValue::Number(n) if n.is_nan() => None,
            RecordValue::Number(n) => Some(*n),
            RecordValue::Text(s) => parse_leading_float(s),
            RecordValue::Empty | RecordValue::Boolean(_) => None,
        }
    }
}

impl Default for RecordValue {
    fn default() -> Self {
        RecordValue::Empty
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        RecordValue::Text(s.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(s: String) -> Self {
        RecordValue::Text(s)
    }
}

impl From<f64> for RecordValue {
    fn from(n: f64) -> Self {
        RecordValue::Number(n)
    }
}

impl From<bool> for RecordValue {
    fn from(b: bool) -> Self {
        RecordValue::Boolean(b)
    }
}

impl<T: Into<RecordValue>> From<Option<T>> for RecordValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RecordValue::Empty)
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

/// Formats a number the way the record set displays it: integral values have
/// no fractional part, non-finite values use their spelled-out names.
/// Magnitudes of at least 1e21 or below 1e-6 use exponent form (`1e+21`,
/// `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        // Avoid "-0"
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else {
        format!("{}", n)
    }
}

/// Parses the longest leading floating-point literal of `s`.
/// Leading whitespace is skipped; trailing garbage is ignored.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            Some(f64::NEG_INFINITY)
        } else {
            Some(f64::INFINITY)
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when it carries at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

// ============================================================================
// RECORD
// ============================================================================

/// A flat, insertion-ordered record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, RecordValue)>,
}

impl Record {
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Builds a record from `(field, value)` pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RecordValue>,
    {
        let mut record = Record::new();
        for (k, v) in pairs {
            record.set(k, v);
        }
        record
    }

    /// Returns the value for `field`, or `None` when the field is absent.
    pub fn get(&self, field: &str) -> Option<&RecordValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Like `get`, but absent fields read as `Empty`.
    pub fn value(&self, field: &str) -> &RecordValue {
        const EMPTY: &RecordValue = &RecordValue::Empty;
        self.get(field).unwrap_or(EMPTY)
    }

    /// Sets `field`, replacing an existing value in place or appending.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<RecordValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a flat object of scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((name, value)) = access.next_entry::<String, RecordValue>()? {
            record.set(name, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display_drops_integral_fraction() {
        assert_eq!(RecordValue::Number(100.0).to_display_string(), "100");
        assert_eq!(RecordValue::Number(2.5).to_display_string(), "2.5");
        assert_eq!(RecordValue::Number(-0.0).to_display_string(), "0");
        assert_eq!(RecordValue::Number(f64::NAN).to_display_string(), "NaN");
    }

    #[test]
    fn test_number_display_exponent_form_at_extreme_magnitudes() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(RecordValue::Number(1e21).to_display_string(), "1e+21");
    }

    #[test]
    fn test_leading_float_parse() {
        assert_eq!(parse_leading_float("42"), Some(42.0));
        assert_eq!(parse_leading_float("  3.5 "), Some(3.5));
        assert_eq!(parse_leading_float("12kg"), Some(12.0));
        assert_eq!(parse_leading_float("-.5"), Some(-0.5));
        assert_eq!(parse_leading_float("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_float("7e"), Some(7.0));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
    }

    #[test]
    fn test_as_number_rejects_non_numeric_kinds() {
        assert_eq!(RecordValue::Empty.as_number(), None);
        assert_eq!(RecordValue::Boolean(true).as_number(), None);
        assert_eq!(RecordValue::text("").as_number(), None);
        assert_eq!(RecordValue::Number(f64::NAN).as_number(), None);
        assert_eq!(RecordValue::text("8.25").as_number(), Some(8.25));
    }

    #[test]
    fn test_blank_values() {
        assert!(RecordValue::Empty.is_blank());
        assert!(RecordValue::text("").is_blank());
        assert!(!RecordValue::Number(0.0).is_blank());
        assert!(!RecordValue::Boolean(false).is_blank());
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut record = Record::from_pairs([("City", "NY"), ("Name", "Ann")]);
        record.set("City", "LA");
        record.set("Sales", 10.0);

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["City", "Name", "Sales"]);
        assert_eq!(record.value("City"), &RecordValue::text("LA"));
        assert_eq!(record.value("Missing"), &RecordValue::Empty);
    }

    #[test]
    fn test_json_preserves_field_order() {
        let json = r#"{"Zeta": "z", "Alpha": 1, "Mid": null, "Flag": true}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid", "Flag"]);
        assert_eq!(record.value("Alpha"), &RecordValue::Number(1.0));
        assert_eq!(record.value("Mid"), &RecordValue::Empty);
        assert_eq!(record.value("Flag"), &RecordValue::Boolean(true));

        let back = serde_json::to_string(&record).unwrap();
        assert_eq!(back, r#"{"Zeta":"z","Alpha":1.0,"Mid":null,"Flag":true}"#);
    }

    #[test]
    fn test_json_rejects_nested_values() {
        let json = r#"{"Tags": ["a", "b"]}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }
}
