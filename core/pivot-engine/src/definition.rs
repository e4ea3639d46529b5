//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The user's assignment of fields to pivot areas.
//!
//! This module contains the types that DESCRIBE a pivot table:
//! - `Layout`: which fields sit in rows, columns, values and filters
//! - `FilterSelections`: the chosen value per filter field
//! - `ActiveMetric`: whether cells display counts or sums
//!
//! A field name appears in at most one area at any time. Every mutation goes
//! through `Layout::assign` / `Layout::remove`, which keep that invariant.

use std::fmt;
use std::str::FromStr;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Filter selection meaning "no constraint".
pub const FILTER_ALL: &str = "All";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Unknown pivot area: {0}")]
    UnknownArea(String),
}

// ============================================================================
// AREAS
// ============================================================================

/// The four areas a field can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Rows,
    Cols,
    Values,
    Filters,
}

impl Area {
    /// All areas, in the order used for normalization.
    pub const ALL: [Area; 4] = [Area::Rows, Area::Cols, Area::Values, Area::Filters];

    /// Wire name of the area.
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Rows => "rows",
            Area::Cols => "cols",
            Area::Values => "values",
            Area::Filters => "filters",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rows" => Ok(Area::Rows),
            "cols" => Ok(Area::Cols),
            "values" => Ok(Area::Values),
            "filters" => Ok(Area::Filters),
            other => Err(LayoutError::UnknownArea(other.to_string())),
        }
    }
}

/// Where a dragged field came from. `All` is the pool of unassigned fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSource {
    All,
    Area(Area),
}

impl FromStr for DropSource {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(DropSource::All)
        } else {
            s.parse().map(DropSource::Area)
        }
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Assignment of field names to pivot areas.
/// Order within `rows` and `cols` sets the composite key join order.
/// Deserialized layouts are normalized, so they always hold the invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLayout")]
pub struct Layout {
    rows: Vec<String>,
    cols: Vec<String>,
    values: Vec<String>,
    filters: Vec<String>,
}

/// Wire form of a `Layout` before normalization. Missing areas are empty.
#[derive(Deserialize)]
struct RawLayout {
    #[serde(default)]
    rows: Vec<String>,
    #[serde(default)]
    cols: Vec<String>,
    #[serde(default)]
    values: Vec<String>,
    #[serde(default)]
    filters: Vec<String>,
}

impl From<RawLayout> for Layout {
    fn from(raw: RawLayout) -> Self {
        Layout {
            rows: raw.rows,
            cols: raw.cols,
            values: raw.values,
            filters: raw.filters,
        }
        .normalized()
    }
}

impl Layout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Layout::default()
    }

    /// Builds a layout from explicit area lists. Duplicates are dropped,
    /// keeping the first occurrence in area order.
    pub fn from_areas<S: Into<String>>(
        rows: impl IntoIterator<Item = S>,
        cols: impl IntoIterator<Item = S>,
        values: impl IntoIterator<Item = S>,
        filters: impl IntoIterator<Item = S>,
    ) -> Self {
        Layout {
            rows: rows.into_iter().map(Into::into).collect(),
            cols: cols.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
            filters: filters.into_iter().map(Into::into).collect(),
        }
        .normalized()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn fields(&self, area: Area) -> &[String] {
        match area {
            Area::Rows => &self.rows,
            Area::Cols => &self.cols,
            Area::Values => &self.values,
            Area::Filters => &self.filters,
        }
    }

    fn fields_mut(&mut self, area: Area) -> &mut Vec<String> {
        match area {
            Area::Rows => &mut self.rows,
            Area::Cols => &mut self.cols,
            Area::Values => &mut self.values,
            Area::Filters => &mut self.filters,
        }
    }

    /// The area currently holding `field`, or `None` if it is unassigned.
    pub fn area_of(&self, field: &str) -> Option<Area> {
        Area::ALL
            .into_iter()
            .find(|&area| self.fields(area).iter().any(|f| f == field))
    }

    /// Moves `field` into `target`, removing it from every other area.
    /// A field already in `target` keeps its position there.
    pub fn assign(&mut self, field: &str, target: Area) {
        let already_there = self.fields(target).iter().any(|f| f == field);
        for area in Area::ALL {
            if area != target || !already_there {
                self.fields_mut(area).retain(|f| f != field);
            }
        }
        if !already_there {
            self.fields_mut(target).push(field.to_string());
        }
    }

    /// Removes `field` from `area` only.
    pub fn remove(&mut self, area: Area, field: &str) {
        self.fields_mut(area).retain(|f| f != field);
    }

    /// Applies a drag-and-drop message. The source is informational: the
    /// move always goes through `assign`, so inconsistent messages cannot
    /// break the one-area-per-field invariant.
    pub fn apply_drop(&mut self, field: &str, source: DropSource, target: Area) {
        if field.is_empty() {
            return;
        }
        log::trace!("drop {} from {:?} onto {}", field, source, target);
        self.assign(field, target);
    }

    /// True when every area is empty.
    pub fn is_empty(&self) -> bool {
        Area::ALL.into_iter().all(|area| self.fields(area).is_empty())
    }

    /// True when rows, cols or values hold anything. Filters alone do not
    /// produce a report worth persisting.
    pub fn has_report_fields(&self) -> bool {
        !self.rows.is_empty() || !self.cols.is_empty() || !self.values.is_empty()
    }

    /// Returns a copy where every field appears at most once across all
    /// areas, keeping its first occurrence in area order.
    pub fn normalized(mut self) -> Self {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        for area in Area::ALL {
            self.fields_mut(area).retain(|f| seen.insert(f.clone()));
        }
        self
    }

    /// Checks the one-area-per-field invariant.
    pub fn is_consistent(&self) -> bool {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        Area::ALL
            .into_iter()
            .flat_map(|area| self.fields(area).iter())
            .all(|f| seen.insert(f.as_str()))
    }

    /// The metric every cell and total shows for this layout.
    pub fn active_metric(&self) -> ActiveMetric {
        ActiveMetric::for_values(&self.values)
    }
}

// ============================================================================
// ACTIVE METRIC
// ============================================================================

/// Which cell aggregate is displayed and totalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveMetric {
    Count,
    Sum,
}

impl ActiveMetric {
    /// Sums when any value field is assigned, counts otherwise.
    pub fn for_values(values: &[String]) -> Self {
        if values.is_empty() {
            ActiveMetric::Count
        } else {
            ActiveMetric::Sum
        }
    }
}

// ============================================================================
// FILTER SELECTIONS
// ============================================================================

/// Chosen value per filter field. Missing, empty and `"All"` selections
/// impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelections {
    selections: FxHashMap<String, String>,
}

impl FilterSelections {
    pub fn new() -> Self {
        FilterSelections::default()
    }

    /// Sets the selection for `field`.
    pub fn select(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.selections.insert(field.into(), value.into());
    }

    /// Builder form of `select`.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.select(field, value);
        self
    }

    pub fn clear(&mut self, field: &str) {
        self.selections.remove(field);
    }

    /// Raw selection for `field`, including `"All"`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.selections.get(field).map(String::as_str)
    }

    /// The selection for `field` if it constrains the record set.
    pub fn active_value(&self, field: &str) -> Option<&str> {
        self.get(field)
            .filter(|value| !value.is_empty() && *value != FILTER_ALL)
    }
}
