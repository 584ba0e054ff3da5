//! Selection domains: the values offered by the county and constituency controls.

use crate::config::DatasetArgs;
use khf_dashboard::Snapshot;
use khf_facility::{FacilityColumn, FilterSelection, Selection, ALL_SENTINEL};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectionOptions {
    /// The county the constituency list was computed for, after normalization.
    pub county: String,
    pub counties: Vec<String>,
    pub constituencies: Vec<String>,
    pub facility_types: Vec<String>,
}

impl SelectionOptions {
    /// Domains for `county`. An unknown county falls back to `All`.
    pub fn for_county(snapshot: &Snapshot, county: Option<String>) -> anyhow::Result<Self> {
        let selection = snapshot
            .db
            .normalize_selection(FilterSelection::new(county.into(), Selection::All))?;

        let mut counties = vec![ALL_SENTINEL.to_string()];
        counties.extend(snapshot.counties.iter().cloned());
        let constituencies = snapshot
            .db
            .selection_options(FacilityColumn::Constituency, &selection.constituency_domain())?;
        let facility_types = snapshot
            .type_colors
            .iter()
            .map(|(t, _)| t.to_string())
            .collect();

        Ok(Self {
            county: selection.county.as_str().to_string(),
            counties,
            constituencies,
            facility_types,
        })
    }
}

/// Print the selection domains as JSON.
pub async fn run_options(dataset: &DatasetArgs, county: Option<String>) -> anyhow::Result<()> {
    let snapshot = Snapshot::load(&dataset.source()).await?;
    let options = SelectionOptions::for_county(&snapshot, county)?;
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use khf_db::Database;

    const CSV: &str = "\
Facility_N,Type,Owner,County,Sub_County,Constituen,Nearest_To,Latitude,Longitude
Mbagathi,Hospital,MoH,Nairobi,Dagoretti,Dagoretti,Nairobi,-1.3,36.8
Kasarani HC,Health Centre,MoH,Nairobi,Kasarani,Kasarani,Nairobi,-1.2,36.9
Kisumu Dispensary,Dispensary,Private,Kisumu,Kisumu East,Kisumu East,Kisumu,-0.1,34.7
";

    fn snapshot() -> Snapshot {
        let (db, report) = Database::from_csv(CSV.as_bytes()).unwrap();
        Snapshot::from_database(db, report).unwrap()
    }

    #[test]
    fn options_for_all() {
        let options = SelectionOptions::for_county(&snapshot(), None).unwrap();
        assert_eq!(options.county, "All");
        assert_eq!(options.counties, vec!["All", "Kisumu", "Nairobi"]);
        assert_eq!(
            options.constituencies,
            vec!["All", "Dagoretti", "Kasarani", "Kisumu East"]
        );
        assert_eq!(
            options.facility_types,
            vec!["Dispensary", "Health Centre", "Hospital"]
        );
    }

    #[test]
    fn constituencies_follow_county() {
        let snapshot = snapshot();
        let options = SelectionOptions::for_county(&snapshot, Some("Kisumu".to_string())).unwrap();
        assert_eq!(options.county, "Kisumu");
        assert_eq!(options.constituencies, vec!["All", "Kisumu East"]);

        let unknown = SelectionOptions::for_county(&snapshot, Some("Atlantis".to_string())).unwrap();
        assert_eq!(unknown.county, "All");
        assert_eq!(unknown.constituencies.len(), 4);
    }
}
