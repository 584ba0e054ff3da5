//! In-memory SQLite database layer for the Kenya health facility dataset.
//!
//! This crate loads the facility CSV into an in-memory SQLite table and exposes
//! typed query methods used by the dashboard renderers.
//!
//! # Architecture
//!
//! - `Arc<Mutex<Connection>>` wrapper so one loaded table can be shared by
//!   concurrent dashboard requests
//! - In-memory SQLite via `rusqlite`, populated once per load inside a single
//!   transaction and never written to afterwards
//! - Every query takes a [`Predicates`](khf_facility::Predicates) set; the
//!   filtered view is the table restricted by those predicates, so a rendered
//!   view is reproducible from the selection alone
//!
//! # Usage
//!
//! ```rust
//! use khf_db::Database;
//! use khf_facility::{FacilityColumn, Predicates, Selection};
//!
//! let csv = "Facility_N,Type,Owner,County,Sub_County,Constituen,Nearest_To,Latitude,Longitude\n\
//!            Mbagathi,Hospital,MoH,Nairobi,Dagoretti,Dagoretti,Nairobi,-1.3,36.8\n";
//! let (db, report) = Database::from_csv(csv.as_bytes()).unwrap();
//! assert_eq!(report.loaded, 1);
//!
//! let nairobi = Predicates::new().with(FacilityColumn::County, Selection::parse("Nairobi"));
//! let rows = db.filter(&nairobi).unwrap();
//! assert_eq!(rows.len(), 1);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the SQL schema.

pub mod error;
pub mod models;
pub mod schema;
pub mod source;
mod loader;
mod queries;

pub use error::DataLoadError;
pub use source::DatasetSource;

use models::LoadReport;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;

/// In-memory SQLite database holding one loaded facility table.
///
/// Cheaply cloneable (via `Arc`); clones share the same connection.
///
/// # Example
///
/// ```rust
/// use khf_db::Database;
///
/// let db = Database::new().unwrap();
/// assert_eq!(db.facility_count().unwrap(), 0);
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    ///
    /// The database is empty after creation; use [`Database::from_csv`] to get
    /// a populated one.
    pub fn new() -> Result<Self, DataLoadError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a database and load a facility CSV (optionally gzipped) into it.
    ///
    /// Either the whole file loads or an error is returned; a partially
    /// loaded table is never handed out.
    pub fn from_csv(data: &[u8]) -> Result<(Self, LoadReport), DataLoadError> {
        let db = Self::new()?;
        let report = db.load_facilities(data)?;
        Ok((db, report))
    }
}
