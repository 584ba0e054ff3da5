//! Where a facility dataset comes from.

use crate::models::LoadReport;
use crate::{DataLoadError, Database};
use std::fmt;
use std::path::PathBuf;

/// Location of a facility CSV: a local file or an `http(s)` URL.
///
/// Remote loading needs the `remote` feature; without it a URL source fails
/// with [`DataLoadError::RemoteDisabled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// Interpret a command-line location.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DatasetSource::Url(trimmed.to_string())
        } else {
            DatasetSource::File(PathBuf::from(trimmed))
        }
    }

    /// Read the raw (possibly gzipped) bytes of the dataset.
    pub async fn read_bytes(&self) -> Result<Vec<u8>, DataLoadError> {
        match self {
            DatasetSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| DataLoadError::Read {
                        path: path.clone(),
                        source,
                    })
            }
            DatasetSource::Url(url) => fetch(url).await,
        }
    }

    /// Read and load the dataset into a fresh in-memory database.
    pub async fn load(&self) -> Result<(Database, LoadReport), DataLoadError> {
        log::info!("loader: Reading dataset from {}", self);
        let bytes = self.read_bytes().await?;
        Database::from_csv(&bytes)
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(feature = "remote")]
async fn fetch(url: &str) -> Result<Vec<u8>, DataLoadError> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    log::info!("loader: Fetched {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}

#[cfg(not(feature = "remote"))]
async fn fetch(url: &str) -> Result<Vec<u8>, DataLoadError> {
    Err(DataLoadError::RemoteDisabled(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_distinguishes_urls_and_paths() {
        assert_eq!(
            DatasetSource::parse("https://example.org/facilities.csv"),
            DatasetSource::Url("https://example.org/facilities.csv".to_string())
        );
        assert_eq!(
            DatasetSource::parse("data/healthcare_facilities.csv"),
            DatasetSource::File(PathBuf::from("data/healthcare_facilities.csv"))
        );
    }

    #[tokio::test]
    async fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Facility_N,Type,Owner,County,Sub_County,Constituen,Nearest_To,Latitude,Longitude"
        )
        .unwrap();
        writeln!(
            file,
            "Mbagathi,Hospital,MoH,Nairobi,Dagoretti,Dagoretti,Nairobi,-1.3,36.8"
        )
        .unwrap();

        let source = DatasetSource::File(file.path().to_path_buf());
        let (db, report) = source.load().await.unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(db.facility_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DatasetSource::File(dir.path().join("nope.csv"));
        match source.load().await {
            Err(DataLoadError::Read { path, .. }) => assert!(path.ends_with("nope.csv")),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("loading a missing file should fail"),
        }
    }
}
