//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the pivot engine integration tests.

#![allow(dead_code)]

use engine::{Record, RecordValue};

/// Small sales dataset with a blank region and an unparseable amount.
pub struct SalesFixture;

impl SalesFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Sales"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, RecordValue)> {
        vec![
            ("North", "Apples", "Q1", RecordValue::Number(100.0)),
            ("North", "Oranges", "Q1", RecordValue::Number(150.0)),
            ("South", "Apples", "Q2", RecordValue::Number(200.0)),
            ("South", "Oranges", "Q2", RecordValue::text("250")),
            ("East", "Apples", "Q1", RecordValue::text("n/a")),
            ("", "Pears", "Q3", RecordValue::Number(75.5)),
            ("North", "Apples", "Q3", RecordValue::Number(50.0)),
        ]
    }

    pub fn records() -> Vec<Record> {
        let headers = Self::headers();
        Self::data()
            .into_iter()
            .map(|(region, product, quarter, sales)| {
                Record::from_pairs(headers.iter().copied().zip([
                    RecordValue::text(region),
                    RecordValue::text(product),
                    RecordValue::text(quarter),
                    sales,
                ]))
            })
            .collect()
    }
}

/// The three-record city scenario.
pub fn city_records() -> Vec<Record> {
    [("NY", 100.0), ("LA", 200.0), ("NY", 150.0)]
        .into_iter()
        .map(|(city, sales)| {
            Record::from_pairs([
                ("City", RecordValue::text(city)),
                ("Sales", RecordValue::Number(sales)),
            ])
        })
        .collect()
}

pub fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
