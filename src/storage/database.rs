//! SQLite snapshot cache for ingested collection dumps.
//!
//! Only raw records are cached; buckets and summaries are always
//! recomputed in memory. Re-ingesting the same dump is idempotent:
//! rows are keyed by document id and replaced in place, so a document
//! whose status changed upstream (say, archived) converges on re-ingest.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::DateTime;
use rusqlite::{params, Connection};

use crate::models::{FeedbackKind, FeedbackRecord, UserRecord};


/// Snapshot counts and ranges used by dashboards and fast mode.
#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    pub total_feedback: i64,
    pub total_users: i64,
    pub oldest_date: Option<String>,
    pub newest_date: Option<String>,
    pub average_rating: Option<f64>,
    pub feedback_by_type: HashMap<String, i64>,
}


/// Initialize the database with required tables.
pub fn init_database(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS feedback_records (
            id TEXT PRIMARY KEY,
            email TEXT,
            feedback_type TEXT NOT NULL,
            feature TEXT,
            location TEXT,
            rating INTEGER,
            comment TEXT NOT NULL,
            image_url TEXT,
            created_at TEXT,
            date TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_records (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL,
            user_type TEXT NOT NULL,
            registered_date TEXT,
            active_status INTEGER NOT NULL,
            status TEXT NOT NULL
        )",
        [],
    )?;

    // Index for date-ranged queries
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_feedback_records_date ON feedback_records(date)",
        [],
    )?;

    Ok(())
}


/// Save feedback records to the database. Returns the number written.
pub fn save_feedback_snapshot(records: &[FeedbackRecord], db_path: &Path) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    init_database(db_path)?;
    let conn = Connection::open(db_path)?;

    let mut saved = 0usize;
    for record in records {
        conn.execute(
            "INSERT OR REPLACE INTO feedback_records (
                id, email, feedback_type, feature, location,
                rating, comment, image_url, created_at, date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.id,
                record.email,
                record.kind.label(),
                record.feature,
                record.location,
                record.rating,
                record.comment,
                record.image_url,
                record.created_at.map(|t| t.to_rfc3339()),
                record.date_key(),
            ],
        )?;
        saved += 1;
    }

    Ok(saved)
}


/// Save user records to the database. Returns the number written.
pub fn save_user_snapshot(records: &[UserRecord], db_path: &Path) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    init_database(db_path)?;
    let conn = Connection::open(db_path)?;

    let mut saved = 0usize;
    for record in records {
        conn.execute(
            "INSERT OR REPLACE INTO user_records (
                id, email, name, age, gender, user_type,
                registered_date, active_status, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.email,
                record.name,
                record.age,
                record.gender,
                record.user_type,
                record.registered_date.map(|t| t.to_rfc3339()),
                record.active_status,
                record.status,
            ],
        )?;
        saved += 1;
    }

    Ok(saved)
}


/// Load all cached feedback records, oldest first (undated last).
pub fn load_feedback_records(db_path: &Path) -> Result<Vec<FeedbackRecord>> {
    if !db_path.exists() {
        return Ok(Vec::new());
    }

    let conn = Connection::open(db_path)?;
    let mut stmt = conn.prepare(
        "SELECT id, email, feedback_type, feature, location,
                rating, comment, image_url, created_at
         FROM feedback_records
         ORDER BY created_at IS NULL, created_at",
    )?;

    let records = stmt
        .query_map([], |row| {
            let kind: String = row.get(2)?;
            let created_at: Option<String> = row.get(8)?;
            Ok(FeedbackRecord {
                id: row.get(0)?,
                email: row.get(1)?,
                kind: if kind == "App" {
                    FeedbackKind::App
                } else {
                    FeedbackKind::Location
                },
                feature: row.get(3)?,
                location: row.get(4)?,
                rating: row.get(5)?,
                comment: row.get(6)?,
                image_url: row.get(7)?,
                created_at: created_at
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|t| t.to_utc()),
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(records)
}


/// Load cached user records; archived accounts are excluded unless asked for.
pub fn load_user_records(db_path: &Path, include_archived: bool) -> Result<Vec<UserRecord>> {
    if !db_path.exists() {
        return Ok(Vec::new());
    }

    let conn = Connection::open(db_path)?;
    let mut stmt = conn.prepare(
        "SELECT id, email, name, age, gender, user_type,
                registered_date, active_status, status
         FROM user_records",
    )?;

    let records: Vec<UserRecord> = stmt
        .query_map([], |row| {
            let registered_date: Option<String> = row.get(6)?;
            Ok(UserRecord {
                id: row.get(0)?,
                email: row.get(1)?,
                name: row.get(2)?,
                age: row.get(3)?,
                gender: row.get(4)?,
                user_type: row.get(5)?,
                registered_date: registered_date
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|t| t.to_utc()),
                active_status: row.get(7)?,
                status: row.get(8)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    if include_archived {
        Ok(records)
    } else {
        Ok(records.into_iter().filter(|u| !u.is_archived()).collect())
    }
}


/// Get database statistics.
pub fn get_database_stats(db_path: &Path) -> Result<DatabaseStats> {
    if !db_path.exists() {
        return Ok(DatabaseStats::default());
    }

    let conn = Connection::open(db_path)?;

    let total_feedback: i64 = conn
        .query_row("SELECT COUNT(*) FROM feedback_records", [], |row| row.get(0))
        .unwrap_or(0);

    let total_users: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM user_records WHERE LOWER(status) != 'archived'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    let (oldest_date, newest_date): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT MIN(date), MAX(date) FROM feedback_records",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap_or((None, None));

    let average_rating: Option<f64> = conn
        .query_row(
            "SELECT AVG(rating) FROM feedback_records WHERE rating BETWEEN 1 AND 5",
            [],
            |row| row.get(0),
        )
        .unwrap_or(None);

    let mut feedback_by_type = HashMap::new();
    if total_feedback > 0 {
        let mut stmt = conn.prepare(
            "SELECT feedback_type, COUNT(*) FROM feedback_records GROUP BY feedback_type",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows.flatten() {
            feedback_by_type.insert(row.0, row.1);
        }
    }

    Ok(DatabaseStats {
        total_feedback,
        total_users,
        oldest_date,
        newest_date,
        average_rating,
        feedback_by_type,
    })
}
