//! SQL schema for the in-memory facility table.
//!
//! The schema is applied as a single batch when the database is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// Creates the `facilities` table. Text columns are nullable: blank source
/// values are stored as NULL so they never show up as a selectable value.
/// Coordinates are `NOT NULL`; rows without usable coordinates are dropped
/// before insertion. Rows keep their load order through the implicit `rowid`.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS facilities (
        name TEXT,
        facility_type TEXT,
        owner TEXT,
        county TEXT,
        sub_county TEXT,
        constituency TEXT,
        nearest_town TEXT,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        division TEXT,
        location TEXT,
        sub_location TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_fac_county ON facilities(county);
    CREATE INDEX IF NOT EXISTS idx_fac_constituency ON facilities(constituency);
    CREATE INDEX IF NOT EXISTS idx_fac_type ON facilities(facility_type);
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_facilities_table_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='facilities'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);

        for idx in ["idx_fac_county", "idx_fac_constituency", "idx_fac_type"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name=?1",
                    [idx],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Index '{}' should exist", idx);
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
