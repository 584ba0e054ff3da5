//! Command-line configuration shared by the subcommands.

use anyhow::Context;
use clap::Args;
use khf_db::DatasetSource;
use khf_facility::FilterSelection;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_DATASET: &str = "data/healthcare_facilities.csv";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8501";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Where to load facilities from.
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Facility CSV: a local path (optionally gzipped) or an http(s) URL
    #[arg(short = 'd', long, default_value = DEFAULT_DATASET)]
    pub dataset: String,
}

impl DatasetArgs {
    pub fn source(&self) -> DatasetSource {
        DatasetSource::parse(&self.dataset)
    }
}

/// County / constituency filter; omitted means "All".
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// County to filter on
    #[arg(short = 'c', long)]
    pub county: Option<String>,

    /// Constituency to filter on (must lie in the selected county)
    #[arg(short = 'n', long)]
    pub constituency: Option<String>,
}

impl SelectionArgs {
    pub fn selection(&self) -> FilterSelection {
        FilterSelection::from_raw(self.county.clone(), self.constituency.clone())
    }
}

/// Resolved settings for the dashboard server.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub source: DatasetSource,
    pub listen: SocketAddr,
    pub cache_ttl: Duration,
}

impl DashboardConfig {
    pub fn new(dataset: &DatasetArgs, listen: &str, cache_ttl_secs: u64) -> anyhow::Result<Self> {
        let listen = listen
            .parse()
            .with_context(|| format!("invalid listen address '{listen}'"))?;
        Ok(Self {
            source: dataset.source(),
            listen,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}
