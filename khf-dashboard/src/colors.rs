//! Facility type → display color assignment.
//!
//! Colors come from the 20-entry "tab20" categorical palette. Types are sorted
//! before assignment, so the mapping depends only on the *set* of types, not on
//! the order they were discovered in. With more than 20 types colors wrap
//! around and repeat; uniqueness beyond the palette size is not guaranteed.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The "tab20" categorical palette.
pub const PALETTE: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Color used for a type that is not in the map.
pub const FALLBACK_COLOR: &str = "#3186cc";

/// Total mapping from every known facility type to a hex color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TypeColorMap(BTreeMap<String, String>);

impl TypeColorMap {
    /// Assign colors to a set of facility types.
    ///
    /// Duplicates are ignored and input order does not matter.
    pub fn assign<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = types
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .collect();
        let map = sorted
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, PALETTE[i % PALETTE.len()].to_string()))
            .collect();
        Self(map)
    }

    /// Color for `facility_type`, or [`FALLBACK_COLOR`] for an unknown type.
    pub fn color_for(&self, facility_type: &str) -> &str {
        self.0
            .get(facility_type)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// (type, color) pairs sorted by type.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(t, c)| (t.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
