//! Portal view assembly
//!
//! The thin layer the calendar and patient-portal pages call: it joins the
//! stored plan, the session logs, and the scheduling core into ready-to-render
//! day views. All classification flows through `schedule`; nothing here adds
//! rules of its own.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::equipment::aggregate_equipment;
use crate::library::LibraryConfig;
use crate::models::{AnnualPlan, NewPatient, Patient, ScheduledExercise};
use crate::plans::load_active_plan;
use crate::schedule::{classify, is_active_on, resolve_day, week_number, DayStatus};
use crate::sessions::{completed_day_set, load_session_logs_between};

/// ---------------------------------------------------------------------------
/// View Types
/// ---------------------------------------------------------------------------

/// Everything one day's detail view needs
#[derive(Debug, Clone, Serialize)]
pub struct DayOverview {
  pub date: NaiveDate,
  /// 1-based plan week, absent before the plan starts or without a plan
  pub week_number: Option<u32>,
  pub status: DayStatus,
  pub exercises: Vec<ScheduledExercise>,
  /// Deduplicated equipment for the day, sorted for stable display
  pub equipment: Vec<String>,
}

/// Per-day cell data for the month calendar (no equipment lookups)
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
  pub date: NaiveDate,
  pub status: DayStatus,
  pub exercise_count: usize,
  pub week_number: Option<u32>,
}

fn plan_week_for(plan: &AnnualPlan, target: NaiveDate) -> Option<u32> {
  let start = plan.start_date?;
  if target < start {
    return None;
  }
  u32::try_from(week_number(start, target)).ok()
}

/// ---------------------------------------------------------------------------
/// Day Views
/// ---------------------------------------------------------------------------

/// Build the full detail view for one day, equipment included.
///
/// `today` comes from the caller so the view is deterministic; `library` is
/// optional because equipment display is best-effort - without a configured
/// library the day simply lists no equipment.
pub async fn day_overview(
  pool: &SqlitePool,
  library: Option<&LibraryConfig>,
  patient_id: i64,
  target: NaiveDate,
  today: NaiveDate,
) -> Result<DayOverview, String> {
  let plan = match load_active_plan(pool, patient_id).await? {
    Some(plan) => plan,
    None => {
      return Ok(DayOverview {
        date: target,
        week_number: None,
        status: DayStatus::Rest,
        exercises: Vec::new(),
        equipment: Vec::new(),
      });
    }
  };

  let logs = load_session_logs_between(pool, patient_id, target, target).await?;
  let completed = completed_day_set(&logs);

  let exercises: Vec<ScheduledExercise> = resolve_day(&plan, target).to_vec();
  let active = is_active_on(&plan, target);
  let status = classify(target, !exercises.is_empty(), active, &completed, today);

  let equipment = match (library, exercises.is_empty()) {
    (Some(config), false) => aggregate_equipment(config, &exercises)
      .await
      .into_iter()
      .collect(),
    _ => Vec::new(),
  };

  Ok(DayOverview {
    date: target,
    week_number: plan_week_for(&plan, target),
    status,
    exercises,
    equipment,
  })
}

/// Classify every day in an inclusive range for calendar rendering.
/// One plan load and one log query serve the whole range.
pub async fn calendar_range(
  pool: &SqlitePool,
  patient_id: i64,
  from: NaiveDate,
  to: NaiveDate,
  today: NaiveDate,
) -> Result<Vec<DaySummary>, String> {
  if from > to {
    return Err(format!("Invalid calendar range: {} after {}", from, to));
  }

  let plan = load_active_plan(pool, patient_id).await?;
  let logs = load_session_logs_between(pool, patient_id, from, to).await?;
  let completed = completed_day_set(&logs);

  let days = from
    .iter_days()
    .take_while(|date| *date <= to)
    .map(|date| match &plan {
      Some(plan) => {
        let exercises = resolve_day(plan, date);
        let active = is_active_on(plan, date);
        DaySummary {
          date,
          status: classify(date, !exercises.is_empty(), active, &completed, today),
          exercise_count: exercises.len(),
          week_number: plan_week_for(plan, date),
        }
      }
      None => DaySummary {
        date,
        status: DayStatus::Rest,
        exercise_count: 0,
        week_number: None,
      },
    })
    .collect();

  Ok(days)
}

/// ---------------------------------------------------------------------------
/// Patient Records
/// ---------------------------------------------------------------------------

pub async fn list_patients(pool: &SqlitePool) -> Result<Vec<Patient>, String> {
  sqlx::query_as::<_, Patient>(
    "SELECT id, name, email, notes, active, created_at FROM patients WHERE active = 1 ORDER BY name",
  )
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to fetch patients: {}", e))
}

pub async fn get_patient(pool: &SqlitePool, patient_id: i64) -> Result<Patient, String> {
  sqlx::query_as::<_, Patient>(
    "SELECT id, name, email, notes, active, created_at FROM patients WHERE id = ?",
  )
  .bind(patient_id)
  .fetch_optional(pool)
  .await
  .map_err(|e| format!("Failed to fetch patient: {}", e))?
  .ok_or_else(|| format!("Patient not found: {}", patient_id))
}

pub async fn create_patient(pool: &SqlitePool, patient: &NewPatient) -> Result<i64, String> {
  let result = sqlx::query("INSERT INTO patients (name, email, notes) VALUES (?, ?, ?)")
    .bind(&patient.name)
    .bind(&patient.email)
    .bind(&patient.notes)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to create patient: {}", e))?;

  Ok(result.last_insert_rowid())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
