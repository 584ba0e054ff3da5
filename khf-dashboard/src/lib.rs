//! Rendering layer of the Kenya health facilities dashboard.
//!
//! Given a loaded [`Snapshot`] and a [`FilterSelection`](khf_facility::FilterSelection),
//! this crate produces every artifact the dashboard shows:
//!
//! - [`colors`]: the facility type → color map shared by the map and charts
//! - [`map`]: the Leaflet facility map description
//! - [`charts`]: summary cards and the county/type/owner/hierarchy charts
//! - [`export`]: the CSV export of the filtered view and its file name
//! - [`page`]: the assembled HTML page (and the load-error page)
//!
//! [`cache::DatasetCache`] keeps the loaded dataset between requests.

pub mod cache;
pub mod charts;
pub mod colors;
pub mod export;
pub mod js_bridge;
pub mod map;
pub mod page;
pub mod snapshot;

pub use cache::DatasetCache;
pub use charts::ChartSet;
pub use colors::TypeColorMap;
pub use export::{export_csv, export_filename};
pub use map::FacilityMap;
pub use page::{render_error_page, DashboardView};
pub use snapshot::Snapshot;
