//! One loaded dataset plus everything derived from it once per load.

use crate::colors::TypeColorMap;
use chrono::{DateTime, Utc};
use khf_db::models::LoadReport;
use khf_db::{DataLoadError, Database, DatasetSource};
use khf_facility::{FacilityColumn, Predicates};
use std::time::{Duration, Instant};

/// An immutable loaded dataset.
///
/// The type → color map and the county domain depend only on the full table,
/// so they are computed here instead of per request.
pub struct Snapshot {
    pub db: Database,
    pub type_colors: TypeColorMap,
    pub counties: Vec<String>,
    pub report: LoadReport,
    pub loaded_at: DateTime<Utc>,
    loaded: Instant,
}

impl Snapshot {
    pub fn from_database(db: Database, report: LoadReport) -> anyhow::Result<Self> {
        let all = Predicates::new();
        let types = db.distinct_values(FacilityColumn::Type, &all)?;
        let type_colors = TypeColorMap::assign(&types);
        let counties = db.distinct_values(FacilityColumn::County, &all)?;
        log::info!(
            "snapshot: {} facilities, {} counties, {} facility types",
            report.loaded,
            counties.len(),
            type_colors.len()
        );
        Ok(Self {
            db,
            type_colors,
            counties,
            report,
            loaded_at: Utc::now(),
            loaded: Instant::now(),
        })
    }

    /// Load `source` into a fresh snapshot.
    pub async fn load(source: &DatasetSource) -> anyhow::Result<Self> {
        let (db, report) = source.load().await?;
        Self::from_database(db, report)
    }

    /// True once the snapshot is older than `ttl`.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.loaded.elapsed() >= ttl
    }

    /// The [`DataLoadError`] behind a failed [`Snapshot::load`], if that is
    /// what `err` wraps.
    pub fn load_error(err: &anyhow::Error) -> Option<&DataLoadError> {
        err.downcast_ref::<DataLoadError>()
    }
}
