//! The closed set of facility columns.
//!
//! Every query that filters, lists distinct values or groups by a column goes
//! through [`FacilityColumn`], so SQL identifiers are always fixed strings and
//! never built from user input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A text column of the facility table.
///
/// Latitude and Longitude are not listed: they are never filtered or grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FacilityColumn {
    Name,
    Type,
    Owner,
    County,
    SubCounty,
    Constituency,
    NearestTown,
    Division,
    Location,
    SubLocation,
}

impl FacilityColumn {
    /// Every text column, in dataset order.
    pub const ALL: [FacilityColumn; 10] = [
        FacilityColumn::Name,
        FacilityColumn::Type,
        FacilityColumn::Owner,
        FacilityColumn::County,
        FacilityColumn::SubCounty,
        FacilityColumn::Constituency,
        FacilityColumn::NearestTown,
        FacilityColumn::Division,
        FacilityColumn::Location,
        FacilityColumn::SubLocation,
    ];

    /// Column name inside the `facilities` SQL table.
    pub fn sql_name(self) -> &'static str {
        match self {
            FacilityColumn::Name => "name",
            FacilityColumn::Type => "facility_type",
            FacilityColumn::Owner => "owner",
            FacilityColumn::County => "county",
            FacilityColumn::SubCounty => "sub_county",
            FacilityColumn::Constituency => "constituency",
            FacilityColumn::NearestTown => "nearest_town",
            FacilityColumn::Division => "division",
            FacilityColumn::Location => "location",
            FacilityColumn::SubLocation => "sub_location",
        }
    }

    /// Accepted header names in a source file. The first entry is the
    /// truncated shapefile-style name used on export.
    pub fn header_names(self) -> &'static [&'static str] {
        match self {
            FacilityColumn::Name => &["Facility_N", "Facility_Name"],
            FacilityColumn::Type => &["Type"],
            FacilityColumn::Owner => &["Owner"],
            FacilityColumn::County => &["County"],
            FacilityColumn::SubCounty => &["Sub_County"],
            FacilityColumn::Constituency => &["Constituen", "Constituency"],
            FacilityColumn::NearestTown => &["Nearest_To", "Nearest_Town"],
            FacilityColumn::Division => &["Division"],
            FacilityColumn::Location => &["Location"],
            FacilityColumn::SubLocation => &["Sub_Locati", "Sub_Location"],
        }
    }

    /// Whether a source file must carry this column.
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            FacilityColumn::Division | FacilityColumn::Location | FacilityColumn::SubLocation
        )
    }

    /// Human readable label for table headers and map popups.
    pub fn label(self) -> &'static str {
        match self {
            FacilityColumn::Name => "Facility",
            FacilityColumn::Type => "Type",
            FacilityColumn::Owner => "Owner",
            FacilityColumn::County => "County",
            FacilityColumn::SubCounty => "Sub-County",
            FacilityColumn::Constituency => "Constituency",
            FacilityColumn::NearestTown => "Nearest Town",
            FacilityColumn::Division => "Division",
            FacilityColumn::Location => "Location",
            FacilityColumn::SubLocation => "Sub-Location",
        }
    }
}

impl fmt::Display for FacilityColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_names()[0])
    }
}
