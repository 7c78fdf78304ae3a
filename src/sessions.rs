//! Session logging and completion lookup
//!
//! Session logs are append-only: the completion flow writes one row per
//! finished session and nothing here ever mutates them. The reconciler only
//! needs the set of calendar days that have at least one log.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use std::collections::HashSet;

use crate::models::{NewSessionLog, SessionLog};

/// Truncate a UTC completion instant to the patient's local calendar day.
///
/// The completion flow records the local day, not the UTC one, so a session
/// finished at 23:50 local still counts toward that local date even when the
/// UTC clock has already rolled over.
pub fn local_session_day(completed_at: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDate {
  (completed_at + Duration::minutes(i64::from(utc_offset_minutes))).date_naive()
}

/// Collapse logs into the calendar-day key set the reconciler consumes.
/// Several logs on the same day collapse to one key.
pub fn completed_day_set(logs: &[SessionLog]) -> HashSet<NaiveDate> {
  logs.iter().map(|log| log.date).collect()
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

/// Append a session log and return its id
pub async fn log_session(pool: &SqlitePool, log: &NewSessionLog) -> Result<i64, String> {
  let result = sqlx::query(
    r#"
    INSERT INTO session_logs (patient_id, date, completed_at, notes)
    VALUES (?, ?, ?, ?)
    "#,
  )
  .bind(log.patient_id)
  .bind(log.date)
  .bind(log.completed_at)
  .bind(&log.notes)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to log session: {}", e))?;

  Ok(result.last_insert_rowid())
}

/// All logs for a patient, newest first
pub async fn load_session_logs(
  pool: &SqlitePool,
  patient_id: i64,
) -> Result<Vec<SessionLog>, String> {
  sqlx::query_as::<_, SessionLog>(
    r#"
    SELECT id, patient_id, date, completed_at, notes, created_at
    FROM session_logs
    WHERE patient_id = ?
    ORDER BY date DESC, id DESC
    "#,
  )
  .bind(patient_id)
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to load session logs: {}", e))
}

/// Logs within an inclusive date range (calendar queries)
pub async fn load_session_logs_between(
  pool: &SqlitePool,
  patient_id: i64,
  from: NaiveDate,
  to: NaiveDate,
) -> Result<Vec<SessionLog>, String> {
  sqlx::query_as::<_, SessionLog>(
    r#"
    SELECT id, patient_id, date, completed_at, notes, created_at
    FROM session_logs
    WHERE patient_id = ? AND date >= ? AND date <= ?
    ORDER BY date ASC, id ASC
    "#,
  )
  .bind(patient_id)
  .bind(from)
  .bind(to)
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to load session logs: {}", e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
