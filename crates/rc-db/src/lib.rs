//! Storage layer for the drive log analyzer.
//!
//! Provides persistence for rulesets, scenarios, speed zones, and violations
//! using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Store`] type wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`. A `Store` can be moved between threads but cannot be shared across
//! threads without external synchronization. The analyzer itself is
//! single-threaded with one active connection; callers offering concurrent
//! entry points must serialize access.
//!
//! # Schema
//!
//! Ruleset rows are deduplicated by exact equality on the three threshold
//! REALs: two rulesets differing only in the 7th decimal digit are distinct
//! rows. Exact float comparison is a known precision hazard; do not replace
//! it with a tolerance without migrating existing data.
//!
//! Violation timestamps are stored as the formatted `MM:SS.s` TEXT. For
//! drives under 100 minutes, lexicographic ordering matches drive ordering.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use thiserror::Error;

use rc_core::{RoadRules, Scenario, Violation};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Store {
    conn: Connection,
}

/// A stored violation row for one scenario, one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredViolation {
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
}

/// A stored violation row across scenarios, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentViolation {
    pub scenario_id: i64,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub details: String,
}

/// Violation count for one kind within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: i64,
}

impl Store {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS ruleset (
                rule_id INTEGER PRIMARY KEY AUTOINCREMENT,
                max_speed REAL NOT NULL,
                min_follow_distance REAL NOT NULL,
                stop_sign_wait REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS scenario (
                scenario_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                source_file TEXT NOT NULL,
                registered_at TEXT NOT NULL,
                ruleset_id INTEGER NOT NULL,
                FOREIGN KEY (ruleset_id) REFERENCES ruleset(rule_id)
            );

            CREATE TABLE IF NOT EXISTS speed_zone (
                zone_id INTEGER PRIMARY KEY AUTOINCREMENT,
                start_mile REAL NOT NULL,
                end_mile REAL NOT NULL,
                speed_limit REAL NOT NULL,
                scenario_id INTEGER NOT NULL,
                FOREIGN KEY (scenario_id) REFERENCES scenario(scenario_id) ON DELETE CASCADE
            );

            -- Violation table: tstamp is the formatted MM:SS.s text
            CREATE TABLE IF NOT EXISTS violation (
                violation_id INTEGER PRIMARY KEY AUTOINCREMENT,
                scenario_id INTEGER NOT NULL,
                tstamp TEXT NOT NULL,
                type TEXT NOT NULL,
                details TEXT NOT NULL,
                FOREIGN KEY (scenario_id) REFERENCES scenario(scenario_id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_violation_scenario ON violation(scenario_id);
            CREATE INDEX IF NOT EXISTS idx_violation_type ON violation(scenario_id, type);
            CREATE INDEX IF NOT EXISTS idx_speed_zone_scenario ON speed_zone(scenario_id);
            ",
        )?;
        Ok(())
    }

    /// Returns the existing ruleset row matching all three thresholds
    /// exactly, inserting a new row otherwise.
    pub fn upsert_ruleset(&mut self, rules: &RoadRules) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "
                SELECT rule_id
                FROM ruleset
                WHERE max_speed = ?
                  AND min_follow_distance = ?
                  AND stop_sign_wait = ?
                ",
                params![rules.max_speed, rules.min_follow_distance, rules.stop_sign_wait],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(rule_id) = existing {
            return Ok(rule_id);
        }

        self.conn.execute(
            "
            INSERT INTO ruleset (max_speed, min_follow_distance, stop_sign_wait)
            VALUES (?, ?, ?)
            ",
            params![rules.max_speed, rules.min_follow_distance, rules.stop_sign_wait],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Inserts a scenario and its speed zones in one transaction, returning
    /// the new scenario ID.
    ///
    /// The resolved display name is stored, so unnamed scenarios persist with
    /// the fallback label.
    pub fn register_scenario(
        &mut self,
        scenario: &Scenario,
        source_file: &str,
        ruleset_id: i64,
    ) -> Result<i64, StoreError> {
        self.register_scenario_at(scenario, source_file, ruleset_id, Utc::now())
    }

    fn register_scenario_at(
        &mut self,
        scenario: &Scenario,
        source_file: &str,
        ruleset_id: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "
            INSERT INTO scenario (name, description, source_file, registered_at, ruleset_id)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                scenario.display_name(),
                scenario.description.as_deref().unwrap_or(""),
                source_file,
                format_timestamp(now),
                ruleset_id,
            ],
        )?;
        let scenario_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO speed_zone (start_mile, end_mile, speed_limit, scenario_id)
                VALUES (?, ?, ?, ?)
                ",
            )?;
            for zone in &scenario.speed_zones {
                stmt.execute(params![
                    zone.start_mile,
                    zone.end_mile,
                    zone.speed_limit,
                    scenario_id,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(scenario_id, zones = scenario.speed_zones.len(), "registered scenario");
        Ok(scenario_id)
    }

    /// Persists a batch of violations for a scenario.
    pub fn save_violations(
        &mut self,
        scenario_id: i64,
        violations: &[Violation],
    ) -> Result<usize, StoreError> {
        if violations.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO violation (scenario_id, tstamp, type, details)
                VALUES (?, ?, ?, ?)
                ",
            )?;
            for violation in violations {
                stmt.execute(params![
                    scenario_id,
                    violation.time,
                    violation.kind.as_str(),
                    violation.details,
                ])?;
            }
        }
        tx.commit()?;
        Ok(violations.len())
    }

    /// Violation counts for a scenario, grouped by kind.
    pub fn violation_counts(&self, scenario_id: i64) -> Result<Vec<ViolationCount>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT type, COUNT(*) AS cnt
            FROM violation
            WHERE scenario_id = ?
            GROUP BY type
            ORDER BY type ASC
            ",
        )?;
        let rows = stmt.query_map([scenario_id], |row| {
            Ok(ViolationCount {
                kind: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// Violations of one kind for a scenario, ordered by stored timestamp
    /// text ascending.
    pub fn violations_by_type(
        &self,
        scenario_id: i64,
        kind: &str,
    ) -> Result<Vec<StoredViolation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT tstamp, type, details
            FROM violation
            WHERE scenario_id = ?
              AND type = ?
            ORDER BY tstamp ASC
            ",
        )?;
        let rows = stmt.query_map(params![scenario_id, kind], |row| {
            Ok(StoredViolation {
                time: row.get(0)?,
                kind: row.get(1)?,
                details: row.get(2)?,
            })
        })?;
        let mut violations = Vec::new();
        for row in rows {
            violations.push(row?);
        }
        Ok(violations)
    }

    /// The most recent violations across all scenarios, insertion sequence
    /// descending.
    pub fn recent_violations(&self, limit: usize) -> Result<Vec<RecentViolation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT scenario_id, tstamp, type, details
            FROM violation
            ORDER BY violation_id DESC
            LIMIT ?
            ",
        )?;
        #[allow(clippy::cast_possible_wrap)]
        let rows = stmt.query_map([limit as i64], |row| {
            Ok(RecentViolation {
                scenario_id: row.get(0)?,
                time: row.get(1)?,
                kind: row.get(2)?,
                details: row.get(3)?,
            })
        })?;
        let mut violations = Vec::new();
        for row in rows {
            violations.push(row?);
        }
        Ok(violations)
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
