//! Core types for the Kenya health facilities dashboard.
//!
//! This crate provides:
//! - [`facility::Facility`]: one row of the facility dataset
//! - [`column::FacilityColumn`]: the closed set of columns the dashboard filters and groups on
//! - [`selection`]: the `"All"`-or-value selections driving every filtered view

pub mod column;
pub mod facility;
pub mod selection;

pub use column::FacilityColumn;
pub use facility::Facility;
pub use selection::{FilterSelection, Predicates, Selection, ALL_SENTINEL};
