/// Error types for loading the facility dataset
use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a facility table.
///
/// Fatal for a dashboard session: the caller shows the message and renders
/// nothing else.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Dataset file could not be read
    #[error("Failed to read dataset {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// HTTP request for a remote dataset failed
    #[cfg(feature = "remote")]
    #[error("Failed to fetch dataset: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A URL was given but remote loading is not compiled in
    #[error("Remote dataset {0} requires the `remote` feature")]
    RemoteDisabled(String),

    /// Gzip stream was corrupt
    #[error("Failed to decompress dataset: {0}")]
    Decompression(std::io::Error),

    /// Input is a recognized format other than CSV
    #[error("Unsupported dataset format: {0} (export it to CSV first)")]
    UnsupportedFormat(&'static str),

    /// CSV structure could not be parsed
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Required column '{0}' not found in dataset header")]
    MissingColumn(String),

    /// SQLite rejected the schema or an insert
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}
