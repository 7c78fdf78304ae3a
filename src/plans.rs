//! Annual plan persistence
//!
//! Plans are written by the plan-editing UI and read-only here. The weekly
//! prescription map travels as a JSON column; the stored date strings are
//! normalized into `NaiveDate` at load time so the scheduling core never
//! sees a raw string. An unparseable start date is logged and loaded as
//! `None`, which the validity filter fails open on.

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::plan::{AnnualPlanRow, NewAnnualPlan};
use crate::models::{AnnualPlan, WeekSchedule};
use crate::schedule::parse_plan_date;

// ---------------------------------------------------------------------------
// Row Normalization
// ---------------------------------------------------------------------------

fn plan_from_row(row: AnnualPlanRow) -> AnnualPlan {
  let start_date = parse_plan_date(&row.start_date);
  if start_date.is_none() {
    warn!(
      plan_id = row.id,
      raw = %row.start_date,
      "Plan start date did not parse; treating plan as always active"
    );
  }

  let end_date = row.end_date.as_deref().and_then(|raw| {
    let parsed = parse_plan_date(raw);
    if parsed.is_none() {
      warn!(plan_id = row.id, raw = %raw, "Plan end date did not parse; treating plan as open-ended");
    }
    parsed
  });

  let weeks: BTreeMap<u32, WeekSchedule> = match serde_json::from_str(&row.weeks_json) {
    Ok(weeks) => weeks,
    Err(e) => {
      warn!(plan_id = row.id, "Plan weeks column did not parse ({}); loading as unplanned", e);
      BTreeMap::new()
    }
  };

  AnnualPlan {
    id: row.id,
    patient_id: row.patient_id,
    title: row.title,
    start_date,
    end_date,
    weeks,
  }
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

/// Load the patient's current plan, if any. Most recently updated active
/// plan wins; the plan editor is responsible for keeping one plan active.
pub async fn load_active_plan(
  pool: &SqlitePool,
  patient_id: i64,
) -> Result<Option<AnnualPlan>, String> {
  let row: Option<AnnualPlanRow> = sqlx::query_as(
    r#"
    SELECT id, patient_id, title, start_date, end_date, weeks_json, active, created_at, updated_at
    FROM annual_plans
    WHERE patient_id = ? AND active = 1
    ORDER BY updated_at DESC, id DESC
    LIMIT 1
    "#,
  )
  .bind(patient_id)
  .fetch_optional(pool)
  .await
  .map_err(|e| format!("Failed to load active plan: {}", e))?;

  Ok(row.map(plan_from_row))
}

/// Load a single plan by id
pub async fn load_plan(pool: &SqlitePool, plan_id: i64) -> Result<AnnualPlan, String> {
  let row: Option<AnnualPlanRow> = sqlx::query_as(
    r#"
    SELECT id, patient_id, title, start_date, end_date, weeks_json, active, created_at, updated_at
    FROM annual_plans
    WHERE id = ?
    "#,
  )
  .bind(plan_id)
  .fetch_optional(pool)
  .await
  .map_err(|e| format!("Failed to load plan: {}", e))?;

  row.map(plan_from_row).ok_or_else(|| format!("Plan not found: {}", plan_id))
}

/// List all plans for a patient, newest first
pub async fn list_plans(pool: &SqlitePool, patient_id: i64) -> Result<Vec<AnnualPlan>, String> {
  let rows: Vec<AnnualPlanRow> = sqlx::query_as(
    r#"
    SELECT id, patient_id, title, start_date, end_date, weeks_json, active, created_at, updated_at
    FROM annual_plans
    WHERE patient_id = ?
    ORDER BY updated_at DESC, id DESC
    "#,
  )
  .bind(patient_id)
  .fetch_all(pool)
  .await
  .map_err(|e| format!("Failed to list plans: {}", e))?;

  Ok(rows.into_iter().map(plan_from_row).collect())
}

/// Insert a new plan and return its id
pub async fn save_plan(pool: &SqlitePool, plan: &NewAnnualPlan) -> Result<i64, String> {
  let weeks_json = serde_json::to_string(&plan.weeks)
    .map_err(|e| format!("Failed to serialize plan weeks: {}", e))?;

  let result = sqlx::query(
    r#"
    INSERT INTO annual_plans (patient_id, title, start_date, end_date, weeks_json)
    VALUES (?, ?, ?, ?, ?)
    "#,
  )
  .bind(plan.patient_id)
  .bind(&plan.title)
  .bind(&plan.start_date)
  .bind(&plan.end_date)
  .bind(&weeks_json)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to save plan: {}", e))?;

  Ok(result.last_insert_rowid())
}

/// Replace a plan's weekly prescription map
pub async fn update_plan_weeks(
  pool: &SqlitePool,
  plan_id: i64,
  weeks: &BTreeMap<u32, WeekSchedule>,
) -> Result<(), String> {
  let weeks_json =
    serde_json::to_string(weeks).map_err(|e| format!("Failed to serialize plan weeks: {}", e))?;

  sqlx::query(
    r#"
    UPDATE annual_plans
    SET weeks_json = ?,
        updated_at = ?
    WHERE id = ?
    "#,
  )
  .bind(&weeks_json)
  .bind(Utc::now().to_rfc3339())
  .bind(plan_id)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to update plan weeks: {}", e))?;

  Ok(())
}

/// Activate or retire a plan
pub async fn set_plan_active(pool: &SqlitePool, plan_id: i64, active: bool) -> Result<(), String> {
  sqlx::query(
    r#"
    UPDATE annual_plans
    SET active = ?,
        updated_at = ?
    WHERE id = ?
    "#,
  )
  .bind(active)
  .bind(Utc::now().to_rfc3339())
  .bind(plan_id)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to update plan: {}", e))?;

  Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
