//! Query result model structs.
//!
//! All structs derive `Serialize` so they can be handed to the chart scripts
//! and the options API as JSON.

use serde::Serialize;

/// Outcome of loading a dataset.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows inserted into the facility table.
    pub loaded: u64,
    /// Rows dropped because Latitude or Longitude was missing or non-numeric.
    pub skipped: u64,
}

/// Headline metrics of a filtered view.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct AggregateMetrics {
    pub total: i64,
    pub counties: i64,
    pub constituencies: i64,
}

impl AggregateMetrics {
    pub fn as_tuple(&self) -> (i64, i64, i64) {
        (self.total, self.counties, self.constituencies)
    }
}

/// Values for the summary cards of the statistics section.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct SummaryStats {
    pub total: i64,
    pub counties: i64,
    pub sub_counties: i64,
    pub types: i64,
}

/// A (value, count) pair for bar and pie charts.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

/// One leaf of the county → sub-county → type breakdown.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HierarchyCount {
    pub county: String,
    pub sub_county: String,
    pub facility_type: String,
    pub count: i64,
}
