//! Typed query methods over the facility table.
//!
//! Every query takes a [`Predicates`] set and runs against the table restricted
//! by it. Column identifiers come from [`FacilityColumn::sql_name`] and values
//! are always bound parameters.
//!
//! # Ordering
//!
//! Text ordering uses SQLite's default BINARY collation, i.e. byte order, which
//! matches Rust's `String` ordering. Filtered rows come back in load order.

use crate::models::{AggregateMetrics, CategoryCount, HierarchyCount, SummaryStats};
use crate::Database;
use khf_facility::{Facility, FacilityColumn, FilterSelection, Predicates, Selection, ALL_SENTINEL};
use rusqlite::{params_from_iter, Row};

impl Database {
    // ───────────────────── Selection domains ─────────────────────

    /// Sorted distinct non-null values of `column` among rows matching `predicates`.
    pub fn distinct_values(
        &self,
        column: FacilityColumn,
        predicates: &Predicates,
    ) -> anyhow::Result<Vec<String>> {
        let col = column.sql_name();
        let (where_sql, values) = build_where(predicates, &[format!("{col} IS NOT NULL")]);
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {col} FROM facilities {where_sql} ORDER BY {col}"
        ))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "query: distinct_values({}) returned {} values",
            column,
            rows.len()
        );
        Ok(rows)
    }

    /// Distinct values prefixed with the `"All"` sentinel, for a selection control.
    pub fn selection_options(
        &self,
        column: FacilityColumn,
        predicates: &Predicates,
    ) -> anyhow::Result<Vec<String>> {
        let mut options = vec![ALL_SENTINEL.to_string()];
        options.extend(self.distinct_values(column, predicates)?);
        Ok(options)
    }

    /// Make a selection consistent with the table.
    ///
    /// A county that does not exist resets to `All`. A constituency that is
    /// not among the selected county's constituencies resets to `All`, so
    /// changing county never leaves a stale constituency behind.
    pub fn normalize_selection(&self, selection: FilterSelection) -> anyhow::Result<FilterSelection> {
        let FilterSelection {
            mut county,
            mut constituency,
        } = selection;

        if let Selection::Value(c) = &county {
            let counties = self.distinct_values(FacilityColumn::County, &Predicates::new())?;
            if counties.binary_search(c).is_err() {
                log::info!("query: Unknown county '{}', resetting to All", c);
                county = Selection::All;
            }
        }

        if let Selection::Value(c) = &constituency {
            let domain = Predicates::new().with(FacilityColumn::County, county.clone());
            let constituencies = self.distinct_values(FacilityColumn::Constituency, &domain)?;
            if constituencies.binary_search(c).is_err() {
                log::info!(
                    "query: Constituency '{}' not in county '{}', resetting to All",
                    c,
                    county
                );
                constituency = Selection::All;
            }
        }

        Ok(FilterSelection::new(county, constituency))
    }

    // ───────────────────── Filtered view ─────────────────────

    /// Rows matching the conjunction of all non-`All` predicates, in load order.
    pub fn filter(&self, predicates: &Predicates) -> anyhow::Result<Vec<Facility>> {
        let (where_sql, values) = build_where(predicates, &[]);
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT COALESCE(name, ''), COALESCE(facility_type, ''), COALESCE(owner, ''),
                    COALESCE(county, ''), COALESCE(sub_county, ''), COALESCE(constituency, ''),
                    COALESCE(nearest_town, ''), latitude, longitude,
                    division, location, sub_location
             FROM facilities {where_sql}
             ORDER BY rowid"
        ))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), facility_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("query: filter returned {} facilities", rows.len());
        Ok(rows)
    }

    /// Total number of loaded facilities.
    pub fn facility_count(&self) -> anyhow::Result<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM facilities", [], |row| row.get(0))?;
        Ok(count)
    }

    // ───────────────────── Aggregations ─────────────────────

    /// (row count, distinct counties, distinct constituencies) of the filtered view.
    pub fn aggregate_metrics(&self, predicates: &Predicates) -> anyhow::Result<AggregateMetrics> {
        let (where_sql, values) = build_where(predicates, &[]);
        let conn = self.conn.lock();
        let metrics = conn.query_row(
            &format!(
                "SELECT COUNT(*), COUNT(DISTINCT county), COUNT(DISTINCT constituency)
                 FROM facilities {where_sql}"
            ),
            params_from_iter(values.iter()),
            |row| {
                Ok(AggregateMetrics {
                    total: row.get(0)?,
                    counties: row.get(1)?,
                    constituencies: row.get(2)?,
                })
            },
        )?;
        log::debug!("query: aggregate_metrics returned {:?}", metrics);
        Ok(metrics)
    }

    /// Values for the summary cards: total, distinct counties, sub-counties and types.
    pub fn summary(&self, predicates: &Predicates) -> anyhow::Result<SummaryStats> {
        let (where_sql, values) = build_where(predicates, &[]);
        let conn = self.conn.lock();
        let stats = conn.query_row(
            &format!(
                "SELECT COUNT(*), COUNT(DISTINCT county), COUNT(DISTINCT sub_county),
                        COUNT(DISTINCT facility_type)
                 FROM facilities {where_sql}"
            ),
            params_from_iter(values.iter()),
            |row| {
                Ok(SummaryStats {
                    total: row.get(0)?,
                    counties: row.get(1)?,
                    sub_counties: row.get(2)?,
                    types: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Row counts grouped by `column`, largest group first, ties by value.
    ///
    /// Rows where `column` is NULL are not counted.
    pub fn count_by(
        &self,
        column: FacilityColumn,
        predicates: &Predicates,
    ) -> anyhow::Result<Vec<CategoryCount>> {
        let col = column.sql_name();
        let (where_sql, values) = build_where(predicates, &[format!("{col} IS NOT NULL")]);
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {col}, COUNT(*) AS n FROM facilities {where_sql}
             GROUP BY {col}
             ORDER BY n DESC, {col}"
        ))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(CategoryCount {
                    name: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("query: count_by({}) returned {} groups", column, rows.len());
        Ok(rows)
    }

    /// Counts per (county, sub-county, type), ordered by those keys.
    pub fn hierarchy_counts(&self, predicates: &Predicates) -> anyhow::Result<Vec<HierarchyCount>> {
        let (where_sql, values) = build_where(
            predicates,
            &[
                "county IS NOT NULL".to_string(),
                "sub_county IS NOT NULL".to_string(),
                "facility_type IS NOT NULL".to_string(),
            ],
        );
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT county, sub_county, facility_type, COUNT(*) FROM facilities {where_sql}
             GROUP BY county, sub_county, facility_type
             ORDER BY county, sub_county, facility_type"
        ))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(HierarchyCount {
                    county: row.get(0)?,
                    sub_county: row.get(1)?,
                    facility_type: row.get(2)?,
                    count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("query: hierarchy_counts returned {} leaves", rows.len());
        Ok(rows)
    }
}

// ───────────────────── Helper Functions ─────────────────────

/// Build a `WHERE` clause from fixed conditions plus the active predicates.
///
/// Returns the clause (empty when there is nothing to constrain) and the
/// values to bind, in placeholder order.
fn build_where(predicates: &Predicates, fixed: &[String]) -> (String, Vec<String>) {
    let mut clauses: Vec<String> = fixed.to_vec();
    let mut values = Vec::new();
    for (column, value) in predicates.active() {
        values.push(value.to_string());
        clauses.push(format!("{} = ?{}", column.sql_name(), values.len()));
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    (where_sql, values)
}

fn facility_from_row(row: &Row<'_>) -> rusqlite::Result<Facility> {
    Ok(Facility {
        name: row.get(0)?,
        facility_type: row.get(1)?,
        owner: row.get(2)?,
        county: row.get(3)?,
        sub_county: row.get(4)?,
        constituency: row.get(5)?,
        nearest_town: row.get(6)?,
        latitude: row.get(7)?,
        longitude: row.get(8)?,
        division: row.get(9)?,
        location: row.get(10)?,
        sub_location: row.get(11)?,
    })
}
