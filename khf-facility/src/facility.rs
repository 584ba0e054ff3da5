use serde::{Deserialize, Serialize};

/// A single health facility from the source dataset.
///
/// Field names serialize to the dataset's own (shapefile-truncated) headers,
/// so a CSV export of facilities can be loaded again as a dataset.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Facility {
    #[serde(rename = "Facility_N")]
    pub name: String,
    #[serde(rename = "Type")]
    pub facility_type: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Sub_County")]
    pub sub_county: String,
    #[serde(rename = "Constituen")]
    pub constituency: String,
    #[serde(rename = "Nearest_To")]
    pub nearest_town: String,
    /// Latitude in decimal degrees
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Division")]
    pub division: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Sub_Locati")]
    pub sub_location: Option<String>,
}

impl Facility {
    /// True when both coordinates are usable for placing a map marker.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::Facility;

    fn kenyatta() -> Facility {
        Facility {
            name: "Kenyatta National Hospital".to_string(),
            facility_type: "National Referral Hospital".to_string(),
            owner: "Ministry of Health".to_string(),
            county: "Nairobi".to_string(),
            sub_county: "Dagoretti North".to_string(),
            constituency: "Dagoretti North".to_string(),
            nearest_town: "Nairobi".to_string(),
            latitude: -1.3010,
            longitude: 36.8065,
            division: None,
            location: None,
            sub_location: None,
        }
    }

    #[test]
    fn test_has_coordinates() {
        let mut facility = kenyatta();
        assert!(facility.has_coordinates());

        facility.latitude = f64::NAN;
        assert!(!facility.has_coordinates());

        facility.latitude = -1.3;
        facility.longitude = f64::INFINITY;
        assert!(!facility.has_coordinates());
    }

    #[test]
    fn test_serializes_with_dataset_headers() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(kenyatta()).unwrap();
        let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let header = data.lines().next().unwrap();
        assert_eq!(
            header,
            "Facility_N,Type,Owner,County,Sub_County,Constituen,Nearest_To,Latitude,Longitude,Division,Location,Sub_Locati"
        );
    }
}
