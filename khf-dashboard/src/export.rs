//! CSV export of the filtered view.

use khf_facility::{Facility, FilterSelection};

/// Header written for every export, in the dataset's own column names.
pub const EXPORT_HEADER: [&str; 12] = [
    "Facility_N",
    "Type",
    "Owner",
    "County",
    "Sub_County",
    "Constituen",
    "Nearest_To",
    "Latitude",
    "Longitude",
    "Division",
    "Location",
    "Sub_Locati",
];

/// Serialize facilities to CSV.
///
/// The header row is always written, so an empty view still exports a file
/// the loader accepts.
pub fn export_csv(facilities: &[Facility]) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(EXPORT_HEADER)?;
    for facility in facilities {
        wtr.serialize(facility)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    log::info!("export: Wrote {} facilities to CSV", facilities.len());
    Ok(String::from_utf8(bytes)?)
}

/// `facilities_{county}_{constituency}.csv`, with `All` written as `all`.
pub fn export_filename(selection: &FilterSelection) -> String {
    format!(
        "facilities_{}_{}.csv",
        selection.county.as_filename_part(),
        selection.constituency.as_filename_part()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use khf_db::Database;
    use khf_facility::{FacilityColumn, Predicates, Selection};

    const CSV: &str = "\
Facility_N,Type,Owner,County,Sub_County,Constituen,Nearest_To,Latitude,Longitude,Division
Mbagathi,Hospital,MoH,Nairobi,Dagoretti,Dagoretti,Nairobi,-1.3,36.8,Kilimani
\"Kasarani, HC\",Health Centre,MoH,Nairobi,Kasarani,Kasarani,Nairobi,-1.2,36.9,
Kisumu Dispensary,Dispensary,Private,Kisumu,Kisumu East,Kisumu East,Kisumu,-0.1,34.7,
";

    #[test]
    fn filename_uses_selection() {
        let all = FilterSelection::default();
        assert_eq!(export_filename(&all), "facilities_all_all.csv");

        let nairobi = FilterSelection::from_raw(
            Some("Nairobi".to_string()),
            Some("Kasarani".to_string()),
        );
        assert_eq!(export_filename(&nairobi), "facilities_Nairobi_Kasarani.csv");

        let odd = FilterSelection::new(Selection::Value("Taita/Taveta".to_string()), Selection::All);
        assert_eq!(export_filename(&odd), "facilities_Taita_Taveta_all.csv");
    }

    #[test]
    fn empty_export_still_has_header() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("Facility_N,Type,Owner,County"));
    }

    #[test]
    fn export_reloads_to_the_same_view() {
        let (db, _) = Database::from_csv(CSV.as_bytes()).unwrap();
        let predicates = Predicates::new().with(
            FacilityColumn::County,
            Selection::Value("Nairobi".to_string()),
        );
        let view = db.filter(&predicates).unwrap();
        assert_eq!(view.len(), 2);

        let csv = export_csv(&view).unwrap();
        assert_eq!(csv.lines().count(), 3);

        let (reloaded, report) = Database::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(reloaded.filter(&Predicates::new()).unwrap(), view);
    }
}
