//! Facility map artifact.
//!
//! [`FacilityMap`] is the serializable description of the Leaflet map drawn by
//! `assets/js/facility-map.js`: one colored marker per facility plus a legend
//! covering every known facility type. The view is always centered on Kenya at
//! a fixed zoom; it does not fit bounds to the filtered facilities.

use crate::colors::TypeColorMap;
use khf_facility::{Facility, FacilityColumn};
use minijinja::HtmlEscape;
use serde::Serialize;

/// National centroid of Kenya, `[lat, lon]`.
pub const DEFAULT_CENTER: [f64; 2] = [0.0236, 37.9062];
pub const DEFAULT_ZOOM: u8 = 6;

/// One facility marker. `tooltip` and `popup` are ready-to-bind HTML with
/// every dataset value escaped.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub color: String,
    pub tooltip: String,
    pub popup: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LegendItem {
    pub facility_type: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FacilityMap {
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    pub legend: Vec<LegendItem>,
}

impl FacilityMap {
    /// Build the map for a filtered view.
    ///
    /// Facilities without usable coordinates are skipped. The legend lists
    /// every type in `colors`, not just the types present in `facilities`,
    /// so it stays the same across filter changes.
    pub fn build(facilities: &[Facility], colors: &TypeColorMap) -> Self {
        let markers: Vec<MapMarker> = facilities
            .iter()
            .filter(|f| f.has_coordinates())
            .map(|f| {
                let tooltip = tooltip_html(f);
                let popup = popup_html(f, &tooltip);
                MapMarker {
                    lat: f.latitude,
                    lon: f.longitude,
                    color: colors.color_for(&f.facility_type).to_string(),
                    tooltip,
                    popup,
                }
            })
            .collect();

        let legend = colors
            .iter()
            .map(|(facility_type, color)| LegendItem {
                facility_type: facility_type.to_string(),
                color: color.to_string(),
            })
            .collect();

        log::debug!("map: built {} markers", markers.len());
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers,
            legend,
        }
    }
}

fn tooltip_html(f: &Facility) -> String {
    format!(
        "<b>{}</b><br>Type: {}<br>Owner: {}<br>County: {}<br>Sub-County: {}<br>Nearest Town: {}",
        HtmlEscape(&f.name),
        HtmlEscape(&f.facility_type),
        HtmlEscape(&f.owner),
        HtmlEscape(&f.county),
        HtmlEscape(&f.sub_county),
        HtmlEscape(&f.nearest_town),
    )
}

fn popup_html(f: &Facility, tooltip: &str) -> String {
    let mut popup = format!("{}<br>Constituency: {}", tooltip, HtmlEscape(&f.constituency));
    let optional = [
        (FacilityColumn::Division, &f.division),
        (FacilityColumn::Location, &f.location),
        (FacilityColumn::SubLocation, &f.sub_location),
    ];
    for (column, value) in optional {
        if let Some(value) = value {
            popup.push_str(&format!("<br>{}: {}", column.label(), HtmlEscape(value)));
        }
    }
    popup
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(name: &str, facility_type: &str, lat: f64, lon: f64) -> Facility {
        Facility {
            name: name.to_string(),
            facility_type: facility_type.to_string(),
            owner: "MoH".to_string(),
            county: "Nairobi".to_string(),
            sub_county: "Dagoretti".to_string(),
            constituency: "Dagoretti North".to_string(),
            nearest_town: "Nairobi".to_string(),
            latitude: lat,
            longitude: lon,
            division: None,
            location: None,
            sub_location: None,
        }
    }

    #[test]
    fn one_marker_per_facility_with_type_color() {
        let colors = TypeColorMap::assign(["Clinic", "Hospital"]);
        let facilities = vec![
            facility("A", "Hospital", -1.3, 36.8),
            facility("B", "Clinic", -1.2, 36.9),
        ];
        let map = FacilityMap::build(&facilities, &colors);
        assert_eq!(map.markers.len(), 2);
        assert_eq!(map.markers[0].color, colors.color_for("Hospital"));
        assert_eq!(map.markers[1].color, colors.color_for("Clinic"));
        assert_eq!(map.center, DEFAULT_CENTER);
        assert_eq!(map.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn facilities_without_coordinates_are_skipped() {
        let colors = TypeColorMap::assign(["Hospital"]);
        let facilities = vec![
            facility("A", "Hospital", f64::NAN, 36.8),
            facility("B", "Hospital", -1.2, 36.9),
        ];
        let map = FacilityMap::build(&facilities, &colors);
        assert_eq!(map.markers.len(), 1);
        assert!(map.markers[0].tooltip.contains("<b>B</b>"));
    }

    #[test]
    fn legend_covers_all_known_types() {
        let colors = TypeColorMap::assign(["Clinic", "Hospital", "Dispensary"]);
        let map = FacilityMap::build(&[], &colors);
        assert!(map.markers.is_empty());
        let types: Vec<&str> = map.legend.iter().map(|l| l.facility_type.as_str()).collect();
        assert_eq!(types, vec!["Clinic", "Dispensary", "Hospital"]);
    }

    #[test]
    fn tooltip_and_popup_content() {
        let mut f = facility("Mission <Hospital> & Co", "Hospital", -1.3, 36.8);
        f.division = Some("Kilimani".to_string());
        let colors = TypeColorMap::assign(["Hospital"]);
        let map = FacilityMap::build(&[f], &colors);
        let marker = &map.markers[0];

        assert!(marker.tooltip.starts_with("<b>Mission &lt;Hospital&gt; &amp; Co</b>"));
        assert!(marker.tooltip.contains("Nearest Town: Nairobi"));
        assert!(!marker.tooltip.contains("Constituency"));

        assert!(marker.popup.starts_with(&marker.tooltip));
        assert!(marker.popup.contains("<br>Constituency: Dagoretti North"));
        assert!(marker.popup.contains("<br>Division: Kilimani"));
        assert!(!marker.popup.contains("Sub-Location"));
    }

    #[test]
    fn popup_appends_admin_fields_in_order() {
        let mut f = facility("Kangemi HC", "Health Centre", -1.26, 36.74);
        f.division = Some("Kabete".to_string());
        f.location = Some("Kangemi".to_string());
        f.sub_location = Some("Gichagi & Kibagare".to_string());
        let colors = TypeColorMap::assign(["Health Centre"]);
        let map = FacilityMap::build(&[f], &colors);

        let popup = &map.markers[0].popup;
        assert!(popup.ends_with(
            "<br>Division: Kabete<br>Location: Kangemi<br>Sub-Location: Gichagi &amp; Kibagare"
        ));
    }
}
