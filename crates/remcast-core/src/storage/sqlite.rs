//! SQLite Storage Implementation
//!
//! Persists retained nights and the current curve snapshot. The store is
//! deliberately small: the pipeline reads a bounded most-recent-first slice
//! of nights and writes back one upsertable model-state row per update run.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use crate::model::{CurveSnapshot, SleepNight};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed persisted bin vector
    #[error("Malformed bin vector: {0}")]
    MalformedBins(#[from] serde_json::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// STORE
// ============================================================================

/// Night history and curve snapshot store
///
/// Wraps a single connection behind a mutex so methods take `&self` and the
/// store is `Send + Sync`. The pipeline runs one update at a time, so
/// connection contention is not a concern here.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Apply performance PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (or create) a store at the given path
    ///
    /// With no path, the database lives in the platform data directory.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("io", "remcast", "core").ok_or_else(|| {
                    StoreError::Init("Could not determine project directories".to_string())
                })?;
                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join("remcast.db")
            }
        };

        let conn = Connection::open(&path)?;
        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (tests and ephemeral use)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::migrations::apply_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Init("Connection lock poisoned".to_string()))
    }

    // ========================================================================
    // NIGHTS
    // ========================================================================

    /// Insert nights, replacing any stored night whose span overlaps
    ///
    /// Sample providers re-deliver overlapping history on every fetch; this
    /// keeps repeated imports convergent instead of accumulating duplicates.
    /// Returns the number of nights inserted.
    pub fn replace_overlapping_nights(&self, nights: &[SleepNight]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for night in nights {
            tx.execute(
                "DELETE FROM sleep_nights WHERE sleep_start < ?1 AND sleep_end > ?2",
                params![night.sleep_end, night.sleep_start],
            )?;
            tx.execute(
                "INSERT INTO sleep_nights (id, sleep_start, sleep_end, rem_seconds, rem_bin_seconds)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    night.id,
                    night.sleep_start,
                    night.sleep_end,
                    night.rem_seconds,
                    serde_json::to_string(&night.rem_bin_seconds)?,
                ],
            )?;
        }

        tx.commit()?;
        tracing::debug!(count = nights.len(), "stored nights with overlap replacement");
        Ok(nights.len())
    }

    /// Fetch up to `limit` nights, most recent sleep start first
    pub fn recent_nights(&self, limit: usize) -> Result<Vec<SleepNight>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, sleep_start, sleep_end, rem_seconds, rem_bin_seconds
             FROM sleep_nights ORDER BY sleep_start DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, DateTime<Utc>>(1)?,
                row.get::<_, DateTime<Utc>>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut nights = Vec::new();
        for row in rows {
            let (id, sleep_start, sleep_end, rem_seconds, bins_json) = row?;
            nights.push(SleepNight {
                id,
                sleep_start,
                sleep_end,
                rem_seconds,
                rem_bin_seconds: serde_json::from_str(&bins_json)?,
            });
        }
        Ok(nights)
    }

    /// Total number of stored nights
    pub fn night_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM sleep_nights", [], |row| row.get(0))?;
        Ok(count)
    }

    // ========================================================================
    // CURVE SNAPSHOT
    // ========================================================================

    /// Write the current probability curve and its parameters
    ///
    /// A single-row upsert: the snapshot is replaced wholesale on every
    /// update run. `updated_at` is the run's reference instant, supplied by
    /// the caller so update gating stays deterministic.
    pub fn upsert_curve_snapshot(
        &self,
        prob_bins: &[f64],
        half_life_days: f64,
        smoothing_radius_bins: usize,
        updated_at: DateTime<Utc>,
    ) -> Result<CurveSnapshot> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO curve_snapshot (id, updated_at, prob_bins, half_life_days, smoothing_radius_bins)
             VALUES (1, ?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 updated_at = excluded.updated_at,
                 prob_bins = excluded.prob_bins,
                 half_life_days = excluded.half_life_days,
                 smoothing_radius_bins = excluded.smoothing_radius_bins",
            params![
                updated_at,
                serde_json::to_string(prob_bins)?,
                half_life_days,
                smoothing_radius_bins as i64,
            ],
        )?;

        Ok(CurveSnapshot {
            updated_at,
            prob_bins: prob_bins.to_vec(),
            half_life_days,
            smoothing_radius_bins,
        })
    }

    /// Read the current curve snapshot, if one was ever written
    pub fn curve_snapshot(&self) -> Result<Option<CurveSnapshot>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT updated_at, prob_bins, half_life_days, smoothing_radius_bins
                 FROM curve_snapshot WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, DateTime<Utc>>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((updated_at, bins_json, half_life_days, radius)) => Ok(Some(CurveSnapshot {
                updated_at,
                prob_bins: serde_json::from_str(&bins_json)?,
                half_life_days,
                smoothing_radius_bins: radius.max(0) as usize,
            })),
            None => Ok(None),
        }
    }

    /// When the snapshot was last written
    pub fn last_updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.curve_snapshot()?.map(|s| s.updated_at))
    }
}

// ============================================================================
// TESTS
// ============================================================================
