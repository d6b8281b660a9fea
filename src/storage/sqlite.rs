use crate::model::{DailyPattern, StorageError};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database (":memory:" is accepted) and creates the schema if missing.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS daily_checkins (
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                energy REAL NOT NULL,
                focus REAL NOT NULL,
                fulfillment REAL NOT NULL,
                recorded_at TEXT NOT NULL,
                PRIMARY KEY (user_id, date)
            );
            "
        )?;

        Ok(Self { conn })
    }

    /// Stores a day's check-in, replacing any earlier entry for the same date.
    pub fn save_checkin(&self, user_id: &str, pattern: &DailyPattern) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO daily_checkins (
                user_id, date, energy, focus, fulfillment, recorded_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                &pattern.date,
                &pattern.energy,
                &pattern.focus,
                &pattern.fulfillment,
                &Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Returns the newest `limit` check-ins for the user, oldest first.
    pub fn recent_patterns(&self, user_id: &str, limit: usize) -> Result<Vec<DailyPattern>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, energy, focus, fulfillment
             FROM daily_checkins WHERE user_id = ?1
             ORDER BY date DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![user_id, limit as i64], Self::map_pattern)?;
        let mut patterns = Vec::new();
        for row in rows {
            patterns.push(row?);
        }
        patterns.reverse();

        Ok(patterns)
    }

    pub fn count_checkins(&self, user_id: &str) -> Result<usize, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM daily_checkins WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn map_pattern(row: &Row) -> Result<DailyPattern, rusqlite::Error> {
        let date: NaiveDate = row.get(0)?;
        Ok(DailyPattern {
            date,
            energy: row.get(1)?,
            focus: row.get(2)?,
            fulfillment: row.get(3)?,
        })
    }
}
