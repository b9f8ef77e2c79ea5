//! Database repository layer
//!
//! The Event Store: insert and read operations over recorded deeds. All
//! aggregate state is derived per request from these queries; nothing here
//! is ever updated in place.
//!
//! Timestamps are stored as RFC 3339 strings in UTC. Day-grained filters
//! compare `date(timestamp)` against `YYYY-MM-DD` strings, which is exact
//! because every stored instant carries a +00:00 offset.

use crate::error::{Error, Result};
use crate::types::{Deed, MonthKey};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Deed operations
    // ============================================

    /// Insert a deed
    pub fn insert_deed(&self, deed: &Deed) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO deeds (id, timestamp, user_id, note)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                deed.id,
                deed.timestamp.to_rfc3339(),
                deed.user_id,
                deed.note,
            ],
        )?;
        Ok(())
    }

    /// List deeds, most recent first
    pub fn list_deeds(&self, limit: i64) -> Result<Vec<Deed>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM deeds ORDER BY timestamp DESC LIMIT ?")?;

        let deeds = stmt
            .query_map([limit], Self::row_to_deed)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(deeds)
    }

    /// Count deeds whose calendar day lies in `[start, end]` (inclusive)
    pub fn count_between(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM deeds WHERE date(timestamp) BETWEEN ?1 AND ?2",
            params![start.to_string(), end.to_string()],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    /// Count deeds recorded on a single calendar day
    pub fn count_on(&self, day: NaiveDate) -> Result<i64> {
        self.count_between(day, day)
    }

    /// Per-day deed counts over `[start, end]`, sparse (days without deeds
    /// are absent). The analytics bucketer gap-fills the result.
    pub fn count_by_day(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<NaiveDate, i64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT date(timestamp) AS day, COUNT(*) AS count
            FROM deeds
            WHERE date(timestamp) BETWEEN ?1 AND ?2
            GROUP BY day
            "#,
        )?;

        let rows = stmt
            .query_map(params![start.to_string(), end.to_string()], |row| {
                let day: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((day, count))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut counts = HashMap::with_capacity(rows.len());
        for (day, count) in rows {
            let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                .map_err(|e| Error::Storage(format!("malformed day key {:?}: {}", day, e)))?;
            counts.insert(date, count);
        }

        Ok(counts)
    }

    /// Per-month deed counts over `[start, end]` month keys, sparse.
    pub fn count_by_month(
        &self,
        start: MonthKey,
        end: MonthKey,
    ) -> Result<HashMap<MonthKey, i64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT strftime('%Y-%m', timestamp) AS month, COUNT(*) AS count
            FROM deeds
            WHERE strftime('%Y-%m', timestamp) BETWEEN ?1 AND ?2
            GROUP BY month
            "#,
        )?;

        let rows = stmt
            .query_map(params![start.to_string(), end.to_string()], |row| {
                let month: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((month, count))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut counts = HashMap::with_capacity(rows.len());
        for (month, count) in rows {
            let key: MonthKey = month
                .parse()
                .map_err(|e| Error::Storage(format!("malformed month key {:?}: {}", month, e)))?;
            counts.insert(key, count);
        }

        Ok(counts)
    }

    /// Raw deed timestamps whose calendar day lies in `[start, end]`,
    /// ascending. Used by the weekday profiler, which classifies events
    /// itself rather than consuming pre-bucketed counts.
    pub fn timestamps_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT timestamp FROM deeds
            WHERE date(timestamp) BETWEEN ?1 AND ?2
            ORDER BY timestamp ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![start.to_string(), end.to_string()], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut timestamps = Vec::with_capacity(rows.len());
        for raw in rows {
            let ts = DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Storage(format!("malformed timestamp {:?}: {}", raw, e)))?;
            timestamps.push(ts);
        }

        Ok(timestamps)
    }

    fn row_to_deed(row: &Row) -> rusqlite::Result<Deed> {
        let timestamp_str: String = row.get("timestamp")?;

        Ok(Deed {
            id: row.get("id")?,
            timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            user_id: row.get("user_id")?,
            note: row.get("note")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn deed_at(y: i32, m: u32, d: u32, h: u32) -> Deed {
        let ts = Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap();
        Deed::new(ts, None)
    }

    #[test]
    fn test_open_on_disk_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeds.db");

        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        db.insert_deed(&deed_at(2024, 3, 5, 9)).unwrap();

        assert!(path.exists());
        assert_eq!(db.list_deeds(10).unwrap().len(), 1);
    }

    #[test]
    fn test_insert_and_list_roundtrip() {
        let db = test_db();
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 14, 2, 33).unwrap();
        let deed = Deed::new(ts, Some("skipped the gym".to_string()));
        db.insert_deed(&deed).unwrap();

        let listed = db.list_deeds(10).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, deed.id);
        assert_eq!(listed[0].timestamp, ts);
        assert_eq!(listed[0].note.as_deref(), Some("skipped the gym"));
    }

    #[test]
    fn test_list_is_most_recent_first_and_limited() {
        let db = test_db();
        for day in 1..=5 {
            db.insert_deed(&deed_at(2024, 3, day, 12)).unwrap();
        }

        let listed = db.list_deeds(3).unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].timestamp > listed[1].timestamp);
        assert!(listed[1].timestamp > listed[2].timestamp);
        assert_eq!(listed[0].timestamp.date_naive().day(), 5);
    }

    #[test]
    fn test_count_between_is_day_inclusive() {
        let db = test_db();
        // One event just after midnight, one just before the next midnight
        db.insert_deed(&Deed::new(
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 1).unwrap(),
            None,
        ))
        .unwrap();
        db.insert_deed(&Deed::new(
            Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap(),
            None,
        ))
        .unwrap();
        db.insert_deed(&deed_at(2024, 3, 6, 1)).unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(db.count_on(day).unwrap(), 2);
        assert_eq!(
            db.count_between(day, day.succ_opt().unwrap()).unwrap(),
            3
        );
    }

    #[test]
    fn test_count_by_day_is_sparse() {
        let db = test_db();
        db.insert_deed(&deed_at(2024, 3, 5, 9)).unwrap();
        db.insert_deed(&deed_at(2024, 3, 5, 21)).unwrap();
        db.insert_deed(&deed_at(2024, 3, 8, 12)).unwrap();

        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let counts = db.count_by_day(start, end).unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()], 2);
        assert_eq!(counts[&NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()], 1);
    }

    #[test]
    fn test_count_by_month_spans_year_rollover() {
        let db = test_db();
        db.insert_deed(&deed_at(2023, 12, 28, 9)).unwrap();
        db.insert_deed(&deed_at(2024, 1, 2, 9)).unwrap();
        db.insert_deed(&deed_at(2024, 1, 15, 9)).unwrap();

        let start = MonthKey {
            year: 2023,
            month: 11,
        };
        let end = MonthKey {
            year: 2024,
            month: 2,
        };
        let counts = db.count_by_month(start, end).unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(
            counts[&MonthKey {
                year: 2023,
                month: 12
            }],
            1
        );
        assert_eq!(counts[&MonthKey { year: 2024, month: 1 }], 2);
    }

    #[test]
    fn test_timestamps_between_ascending() {
        let db = test_db();
        db.insert_deed(&deed_at(2024, 3, 7, 18)).unwrap();
        db.insert_deed(&deed_at(2024, 3, 5, 9)).unwrap();

        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let timestamps = db.timestamps_between(start, end).unwrap();

        assert_eq!(timestamps.len(), 2);
        assert!(timestamps[0] < timestamps[1]);
    }
}
