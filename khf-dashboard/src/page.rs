//! Dashboard page assembly.
//!
//! A [`DashboardView`] is everything one request shows for a (county,
//! constituency) selection: the selection domains, headline metrics, the map,
//! the chart set, the filtered rows and the export link. It renders to a full
//! HTML page through the templates in `templates/`.

use crate::charts::ChartSet;
use crate::export::export_filename;
use crate::js_bridge::{self, json_literal, render_call};
use crate::map::FacilityMap;
use crate::snapshot::Snapshot;
use khf_db::models::{AggregateMetrics, LoadReport};
use khf_facility::{Facility, FacilityColumn, FilterSelection, ALL_SENTINEL};
use minijinja::{context, Environment};
use serde::Serialize;
use serde_json::json;

const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.html");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

pub const PAGE_TITLE: &str = "Health Facilities in Kenya";
const NO_DATA: &str = "No data available for the selected filters.";

/// Text columns of the facility table, before the coordinates.
const TABLE_COLUMNS: [FacilityColumn; 6] = [
    FacilityColumn::Name,
    FacilityColumn::Type,
    FacilityColumn::Owner,
    FacilityColumn::SubCounty,
    FacilityColumn::Constituency,
    FacilityColumn::NearestTown,
];

/// One fully resolved dashboard view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub county_options: Vec<String>,
    pub constituency_options: Vec<String>,
    pub metrics: AggregateMetrics,
    pub map: FacilityMap,
    pub charts: ChartSet,
    pub facilities: Vec<Facility>,
    pub report: LoadReport,
    pub loaded_at: String,
    /// Route serving the CSV export. `None` for a static page, which links
    /// to an export file written next to it instead.
    pub export_endpoint: Option<String>,
}

impl DashboardView {
    /// Build the view for `selection`, after normalizing it against the
    /// loaded table.
    pub fn build(
        snapshot: &Snapshot,
        selection: FilterSelection,
        export_endpoint: Option<&str>,
    ) -> anyhow::Result<Self> {
        let db = &snapshot.db;
        let selection = db.normalize_selection(selection)?;
        let predicates = selection.predicates();

        let mut county_options = vec![ALL_SENTINEL.to_string()];
        county_options.extend(snapshot.counties.iter().cloned());
        let constituency_options = db.selection_options(
            FacilityColumn::Constituency,
            &selection.constituency_domain(),
        )?;

        let metrics = db.aggregate_metrics(&predicates)?;
        let facilities = db.filter(&predicates)?;
        let map = FacilityMap::build(&facilities, &snapshot.type_colors);
        let charts = ChartSet::query(db, &predicates)?;

        log::info!(
            "page: Built view for {} with {} facilities",
            selection.label(),
            metrics.total
        );
        Ok(Self {
            selection,
            county_options,
            constituency_options,
            metrics,
            map,
            charts,
            facilities,
            report: snapshot.report,
            loaded_at: snapshot.loaded_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            export_endpoint: export_endpoint.map(str::to_string),
        })
    }

    pub fn export_filename(&self) -> String {
        export_filename(&self.selection)
    }

    /// Inline script: the embedded map/chart functions plus one guarded call
    /// per artifact that has data.
    pub fn page_script(&self, snapshot: &Snapshot) -> anyhow::Result<String> {
        let mut calls = vec![render_call(
            "renderFacilityMap",
            "facility-map",
            &[json_literal(&self.map)?],
        )];
        if !self.charts.is_empty() {
            calls.extend(self.chart_calls(snapshot)?);
        }

        Ok(format!(
            "{}\ndocument.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
            js_bridge::chart_scripts(),
            calls.join("\n")
        ))
    }

    fn chart_calls(&self, snapshot: &Snapshot) -> anyhow::Result<Vec<String>> {
        let colors = json_literal(&json!({ "colors": &snapshot.type_colors }))?;
        let mut calls = Vec::new();
        if !self.charts.by_county.is_empty() {
            calls.push(render_call(
                "renderBarChart",
                "chart-county",
                &[
                    json_literal(&self.charts.by_county)?,
                    json_literal(&json!({ "color": "#1f77b4" }))?,
                ],
            ));
        }
        if !self.charts.by_type.is_empty() {
            calls.push(render_call(
                "renderPieChart",
                "chart-type",
                &[json_literal(&self.charts.by_type)?, colors.clone()],
            ));
        }
        if !self.charts.by_owner.is_empty() {
            calls.push(render_call(
                "renderBarChart",
                "chart-owner",
                &[
                    json_literal(&self.charts.by_owner)?,
                    json_literal(&json!({ "color": "#ff7f0e", "width": 1100 }))?,
                ],
            ));
        }
        if !self.charts.hierarchy.children.is_empty() {
            calls.push(render_call(
                "renderTreemap",
                "chart-hierarchy",
                &[json_literal(&self.charts.hierarchy)?, colors],
            ));
        }
        Ok(calls)
    }

    /// Render the full HTML page.
    pub fn to_html(&self, snapshot: &Snapshot) -> anyhow::Result<String> {
        let env = environment()?;
        let template = env.get_template("dashboard.html")?;
        let html = template.render(context! {
            title => PAGE_TITLE,
            leaflet_css => js_bridge::LEAFLET_CSS,
            leaflet_js => js_bridge::LEAFLET_JS,
            d3_js => js_bridge::D3_JS,
            interactive => self.export_endpoint.is_some(),
            county => self.selection.county.as_str(),
            constituency => self.selection.constituency.as_str(),
            location_label => self.selection.label(),
            county_options => &self.county_options,
            constituency_options => &self.constituency_options,
            metrics => &self.metrics,
            charts => &self.charts,
            table_headers => table_headers(),
            facilities => &self.facilities,
            report => &self.report,
            loaded_at => &self.loaded_at,
            export_endpoint => &self.export_endpoint,
            export_filename => self.export_filename(),
            no_data => NO_DATA,
            scripts => self.page_script(snapshot)?,
        })?;
        Ok(html)
    }
}

fn table_headers() -> Vec<&'static str> {
    let mut headers: Vec<&str> = TABLE_COLUMNS.iter().map(|c| c.label()).collect();
    headers.extend(["Latitude", "Longitude", FacilityColumn::County.label()]);
    headers
}

/// Error page shown instead of the dashboard when the dataset cannot be loaded.
pub fn render_error_page(title: &str, message: &str) -> anyhow::Result<String> {
    let env = environment()?;
    let template = env.get_template("error.html")?;
    Ok(template.render(context! { title => title, message => message })?)
}

fn environment() -> anyhow::Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_filter("thousands", thousands);
    env.add_template("dashboard.html", DASHBOARD_TEMPLATE)?;
    env.add_template("error.html", ERROR_TEMPLATE)?;
    Ok(env)
}

/// `1234567` → `"1,234,567"`.
fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use khf_db::Database;
    use khf_facility::Selection;

    const CSV: &str = "\
Facility_N,Type,Owner,County,Sub_County,Constituen,Nearest_To,Latitude,Longitude
Mbagathi,Hospital,MoH,Nairobi,Dagoretti,Dagoretti,Nairobi,-1.3,36.8
Kasarani HC,Health Centre,MoH,Nairobi,Kasarani,Kasarani,Nairobi,-1.2,36.9
<Kisumu> Dispensary,Dispensary,Private,Kisumu,Kisumu East,Kisumu East,Kisumu,-0.1,34.7
";

    fn snapshot() -> Snapshot {
        let (db, report) = Database::from_csv(CSV.as_bytes()).unwrap();
        Snapshot::from_database(db, report).unwrap()
    }

    fn select(county: &str, constituency: &str) -> FilterSelection {
        FilterSelection::new(Selection::parse(county), Selection::parse(constituency))
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(10452), "10,452");
        assert_eq!(thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn nairobi_view() {
        let snapshot = snapshot();
        let view = DashboardView::build(&snapshot, select("Nairobi", "All"), Some("/export.csv"))
            .unwrap();
        assert_eq!(view.metrics.as_tuple(), (2, 1, 2));
        assert_eq!(view.county_options, vec!["All", "Kisumu", "Nairobi"]);
        assert_eq!(view.constituency_options, vec!["All", "Dagoretti", "Kasarani"]);
        assert_eq!(view.map.markers.len(), 2);
        assert_eq!(view.map.legend.len(), 3);
        assert_eq!(view.charts.summary.total, 2);
        assert_eq!(view.export_filename(), "facilities_Nairobi_all.csv");
    }

    #[test]
    fn stale_constituency_is_reset() {
        let snapshot = snapshot();
        let view = DashboardView::build(&snapshot, select("Kisumu", "Kasarani"), None).unwrap();
        assert_eq!(view.selection.constituency, Selection::All);
        assert_eq!(view.metrics.total, 1);
    }

    #[test]
    fn html_page_contains_every_section() {
        let snapshot = snapshot();
        let view = DashboardView::build(&snapshot, select("All", "All"), Some("/export.csv"))
            .unwrap();
        let html = view.to_html(&snapshot).unwrap();
        assert!(html.contains("<title>Health Facilities in Kenya</title>"));
        assert!(html.contains("<option value=\"Nairobi\">Nairobi</option>"));
        assert!(html.contains("id=\"facility-map\""));
        assert!(html.contains("id=\"chart-county\""));
        assert!(html.contains("id=\"chart-hierarchy\""));
        assert!(html.contains("renderFacilityMap('facility-map'"));
        assert!(html.contains("export.csv?county=All&amp;constituency=All"));
        assert!(html.contains("&lt;Kisumu&gt; Dispensary"));
        assert!(!html.contains("<Kisumu>"));
        assert!(html.contains(
            "<th>Facility</th><th>Type</th><th>Owner</th><th>Sub-County</th>\
             <th>Constituency</th><th>Nearest Town</th><th>Latitude</th>\
             <th>Longitude</th><th>County</th>"
        ));
    }

    #[test]
    fn empty_table_renders_map_without_chart_calls() {
        let header = CSV.lines().next().unwrap();
        let (db, report) = Database::from_csv(header.as_bytes()).unwrap();
        let snapshot = Snapshot::from_database(db, report).unwrap();
        let view = DashboardView::build(&snapshot, select("All", "All"), None).unwrap();
        assert!(view.charts.is_empty());

        let script = view.page_script(&snapshot).unwrap();
        assert!(script.contains("renderFacilityMap('facility-map'"));
        assert!(!script.contains("renderBarChart('chart-county'"));
        assert!(!script.contains("renderTreemap('chart-hierarchy'"));
        let html = view.to_html(&snapshot).unwrap();
        assert!(html.contains(NO_DATA));
    }

    #[test]
    fn static_page_links_export_file() {
        let snapshot = snapshot();
        let view = DashboardView::build(&snapshot, select("Nairobi", "Kasarani"), None).unwrap();
        let html = view.to_html(&snapshot).unwrap();
        assert!(html.contains("href=\"facilities_Nairobi_Kasarani.csv\""));
        assert!(!html.contains("<select"));
        assert!(html.contains("<h2>Facilities in Nairobi "));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = render_error_page("Dataset unavailable", "missing <file>").unwrap();
        assert!(html.contains("Dataset unavailable"));
        assert!(html.contains("missing &lt;file&gt;"));
    }
}
