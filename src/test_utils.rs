//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Seed helpers for patients, plans, and session logs

use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::models::plan::NewAnnualPlan;
use crate::models::{AnnualPlan, Prescription, ScheduledExercise, WeekSchedule};
use crate::plans::save_plan;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed one patient and return its id
pub async fn seed_test_patient(pool: &SqlitePool) -> i64 {
  let result = sqlx::query("INSERT INTO patients (name, email) VALUES (?, ?)")
    .bind("Paciente de prueba")
    .bind("paciente@example.test")
    .execute(pool)
    .await
    .expect("Failed to seed patient");

  result.last_insert_rowid()
}

/// Seed an empty active plan anchored at `start_date` and return its id
pub async fn seed_test_plan(pool: &SqlitePool, patient_id: i64, start_date: &str) -> i64 {
  seed_test_plan_with_weeks(pool, patient_id, start_date, BTreeMap::new()).await
}

/// Seed an active plan with the given weekly prescriptions
pub async fn seed_test_plan_with_weeks(
  pool: &SqlitePool,
  patient_id: i64,
  start_date: &str,
  weeks: BTreeMap<u32, WeekSchedule>,
) -> i64 {
  save_plan(
    pool,
    &NewAnnualPlan {
      patient_id,
      title: format!("Plan {}", start_date),
      start_date: start_date.to_string(),
      end_date: None,
      weeks,
    },
  )
  .await
  .expect("Failed to seed plan")
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create a mock scheduled exercise for testing
pub fn mock_scheduled_exercise(exercise_id: &str) -> ScheduledExercise {
  ScheduledExercise {
    exercise_id: exercise_id.to_string(),
    name: format!("Ejercicio {}", exercise_id),
    prescription: Prescription::Strength {
      sets: 3,
      reps: 10,
      load_kg: None,
    },
  }
}

/// Create an in-memory plan without touching the database
pub fn mock_plan(
  start_date: NaiveDate,
  end_date: Option<NaiveDate>,
  weeks: BTreeMap<u32, WeekSchedule>,
) -> AnnualPlan {
  AnnualPlan {
    id: 1,
    patient_id: 1,
    title: "Plan de prueba".to_string(),
    start_date: Some(start_date),
    end_date,
    weeks,
  }
}

/// Two weeks of prescriptions: week 1 trains Monday and Wednesday, week 2
/// trains Friday. Everything else is rest.
pub fn test_weeks() -> BTreeMap<u32, WeekSchedule> {
  let mut week1 = WeekSchedule::default();
  week1.monday = vec![
    mock_scheduled_exercise("ex-row"),
    mock_scheduled_exercise("ex-squat"),
  ];
  week1.wednesday = vec![mock_scheduled_exercise("ex-plank")];

  let mut week2 = WeekSchedule::default();
  week2.friday = vec![mock_scheduled_exercise("ex-stretch")];

  let mut weeks = BTreeMap::new();
  weeks.insert(1, week1);
  weeks.insert(2, week2);
  weeks
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('patients', 'annual_plans', 'session_logs')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_helpers_build_consistent_data() {
    let pool = setup_test_db().await;

    let patient_id = seed_test_patient(&pool).await;
    let plan_id = seed_test_plan_with_weeks(&pool, patient_id, "2024-01-01", test_weeks()).await;
    assert!(plan_id > 0);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM annual_plans WHERE patient_id = ?")
      .bind(patient_id)
      .fetch_one(&pool)
      .await
      .expect("Failed to count plans");
    assert_eq!(count, 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let exercise = mock_scheduled_exercise("ex-row");
    assert_eq!(exercise.exercise_id, "ex-row");

    let weeks = test_weeks();
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks.get(&1).map(|w| w.monday.len()), Some(2));
    assert!(weeks.get(&1).map(|w| w.sunday.is_empty()).unwrap_or(false));
  }
}
