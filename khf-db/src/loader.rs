//! CSV loading for the facility table.
//!
//! The source file is the public Kenya healthcare facilities extract, whose
//! headers are shapefile-truncated (`Facility_N`, `Constituen`, ...). Long
//! header names are accepted too, see
//! [`FacilityColumn::header_names`](khf_facility::FacilityColumn::header_names).
//!
//! # CSV Format
//!
//! ```text
//! Facility_N,Type,Owner,County,Sub_County,Constituen,Nearest_To,Latitude,Longitude[,Division,Location,Sub_Locati]
//! Mbagathi District Hospital,District Hospital,Ministry of Health,Nairobi,Dagoretti,Dagoretti,Nairobi,-1.3087,36.8027
//! ```
//!
//! Fields are decoded as UTF-8 when valid and as ISO-8859-1 otherwise, so
//! legacy single-byte exports load without errors.

use crate::models::LoadReport;
use crate::{DataLoadError, Database};
use csv::ByteRecord;
use flate2::read::MultiGzDecoder;
use khf_facility::FacilityColumn;
use rusqlite::params;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Read;

const LATITUDE_HEADER: &str = "Latitude";
const LONGITUDE_HEADER: &str = "Longitude";
const PARQUET_MAGIC: &[u8] = b"PAR1";

impl Database {
    /// Load facilities from CSV bytes (plain or gzipped).
    ///
    /// Rows whose Latitude or Longitude is empty, non-numeric or non-finite
    /// are skipped and counted in the returned [`LoadReport`]. All inserts
    /// happen in one transaction, so on error the table is left unchanged.
    pub(crate) fn load_facilities(&self, data: &[u8]) -> Result<LoadReport, DataLoadError> {
        let data = decompress_if_gzipped(data)?;
        if data.starts_with(PARQUET_MAGIC) {
            return Err(DataLoadError::UnsupportedFormat("Parquet"));
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data.as_ref());

        let layout = ColumnLayout::resolve(rdr.byte_headers()?)?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut loaded = 0u64;
        let mut skipped = 0u64;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO facilities
                 (name, facility_type, owner, county, sub_county, constituency, nearest_town,
                  latitude, longitude, division, location, sub_location)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;

            for result in rdr.byte_records() {
                let r = result?;
                let (latitude, longitude) = match (
                    coordinate(&r, layout.latitude),
                    coordinate(&r, layout.longitude),
                ) {
                    (Some(lat), Some(lon)) => (lat, lon),
                    _ => {
                        skipped += 1;
                        continue;
                    }
                };

                stmt.execute(params![
                    layout.text(&r, FacilityColumn::Name),
                    layout.text(&r, FacilityColumn::Type),
                    layout.text(&r, FacilityColumn::Owner),
                    layout.text(&r, FacilityColumn::County),
                    layout.text(&r, FacilityColumn::SubCounty),
                    layout.text(&r, FacilityColumn::Constituency),
                    layout.text(&r, FacilityColumn::NearestTown),
                    latitude,
                    longitude,
                    layout.text(&r, FacilityColumn::Division),
                    layout.text(&r, FacilityColumn::Location),
                    layout.text(&r, FacilityColumn::SubLocation),
                ])?;
                loaded += 1;
            }
        }
        tx.commit()?;

        log::info!(
            "loader: Loaded {} facilities, skipped {} without valid coordinates",
            loaded,
            skipped
        );
        Ok(LoadReport { loaded, skipped })
    }
}

/// Header positions of every known column in one source file.
struct ColumnLayout {
    text: BTreeMap<FacilityColumn, usize>,
    latitude: usize,
    longitude: usize,
}

impl ColumnLayout {
    fn resolve(headers: &ByteRecord) -> Result<Self, DataLoadError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| decode_field(h).trim().to_string())
            .collect();
        let position = |aliases: &[&str]| {
            names
                .iter()
                .position(|name| aliases.iter().any(|alias| name == alias))
        };

        let mut text = BTreeMap::new();
        for column in FacilityColumn::ALL {
            match position(column.header_names()) {
                Some(idx) => {
                    text.insert(column, idx);
                }
                None if column.is_required() => {
                    return Err(DataLoadError::MissingColumn(column.to_string()));
                }
                None => {}
            }
        }

        let latitude = position(&[LATITUDE_HEADER])
            .ok_or_else(|| DataLoadError::MissingColumn(LATITUDE_HEADER.to_string()))?;
        let longitude = position(&[LONGITUDE_HEADER])
            .ok_or_else(|| DataLoadError::MissingColumn(LONGITUDE_HEADER.to_string()))?;

        Ok(Self {
            text,
            latitude,
            longitude,
        })
    }

    /// Trimmed text value, `None` when the column is absent or blank.
    fn text(&self, record: &ByteRecord, column: FacilityColumn) -> Option<String> {
        let idx = *self.text.get(&column)?;
        let value = decode_field(record.get(idx)?);
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Parse a coordinate, treating anything non-numeric or non-finite as missing.
fn coordinate(record: &ByteRecord, idx: usize) -> Option<f64> {
    decode_field(record.get(idx)?)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Decode a raw field as UTF-8, falling back to ISO-8859-1.
///
/// Every byte is a valid ISO-8859-1 code point, so this never fails.
fn decode_field(raw: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(raw) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(raw.iter().map(|&b| char::from(b)).collect()),
    }
}

fn decompress_if_gzipped(data: &[u8]) -> Result<Cow<'_, [u8]>, DataLoadError> {
    const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
    if !data.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(data));
    }
    let mut out = Vec::new();
    MultiGzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(DataLoadError::Decompression)?;
    log::info!(
        "loader: Decompressed {} bytes to {} bytes",
        data.len(),
        out.len()
    );
    Ok(Cow::Owned(out))
}
