//! Filter selections.
//!
//! A [`Selection`] is either the `"All"` sentinel (no constraint) or an exact
//! value. [`Predicates`] is the conjunction of selections that every query in
//! `khf-db` accepts; [`FilterSelection`] is the (County, Constituency) pair the
//! dashboard exposes to users.

use crate::column::FacilityColumn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The sentinel shown first in every selection domain.
pub const ALL_SENTINEL: &str = "All";

/// Either no constraint or an exact-match value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    All,
    Value(String),
}

impl Selection {
    /// Parse a raw control value. `"All"` and blank input mean no constraint.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_SENTINEL {
            Selection::All
        } else {
            Selection::Value(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Value(v) => Some(v),
        }
    }

    /// The selection as it appears in a control: the value, or `"All"`.
    pub fn as_str(&self) -> &str {
        self.value().unwrap_or(ALL_SENTINEL)
    }

    /// The selection as a file name fragment: `"all"` for the sentinel,
    /// otherwise the value with anything but ASCII alphanumerics, `-` and `_`
    /// replaced by `_`.
    pub fn as_filename_part(&self) -> String {
        match self {
            Selection::All => "all".to_string(),
            Selection::Value(v) => v
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect(),
        }
    }
}

impl From<Option<String>> for Selection {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(Selection::parse).unwrap_or_default()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conjunction of per-column selections.
///
/// Columns mapped to [`Selection::All`] add no constraint; an empty set
/// matches every row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Predicates(BTreeMap<FacilityColumn, Selection>);

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any earlier selection for `column`.
    pub fn with(mut self, column: FacilityColumn, selection: Selection) -> Self {
        self.0.insert(column, selection);
        self
    }

    /// Only the constraining (non-`All`) predicates, in column order.
    pub fn active(&self) -> impl Iterator<Item = (FacilityColumn, &str)> + '_ {
        self.0
            .iter()
            .filter_map(|(column, selection)| selection.value().map(|v| (*column, v)))
    }
}

/// The (County, Constituency) pair picked in the dashboard controls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    pub county: Selection,
    pub constituency: Selection,
}

impl FilterSelection {
    pub fn new(county: Selection, constituency: Selection) -> Self {
        Self {
            county,
            constituency,
        }
    }

    /// Parse raw control values, typically HTTP query or CLI arguments.
    pub fn from_raw(county: Option<String>, constituency: Option<String>) -> Self {
        Self::new(county.into(), constituency.into())
    }

    pub fn predicates(&self) -> Predicates {
        Predicates::new()
            .with(FacilityColumn::County, self.county.clone())
            .with(FacilityColumn::Constituency, self.constituency.clone())
    }

    /// Predicates for the constituency domain: only the county constrains it.
    pub fn constituency_domain(&self) -> Predicates {
        Predicates::new().with(FacilityColumn::County, self.county.clone())
    }

    /// Human readable location label, e.g. `"Nairobi / Kasarani"`.
    pub fn label(&self) -> String {
        match &self.constituency {
            Selection::All => self.county.as_str().to_string(),
            Selection::Value(c) => format!("{} / {}", self.county.as_str(), c),
        }
    }
}
