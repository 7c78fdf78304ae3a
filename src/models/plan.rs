use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw plan row as stored. Dates stay TEXT here; parsing happens when the
/// row is lifted into an `AnnualPlan` so one bad value cannot poison a query.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnnualPlanRow {
  pub id: i64,
  pub patient_id: i64,
  pub title: String,
  pub start_date: String,
  pub end_date: Option<String>,
  pub weeks_json: String,
  pub active: Option<bool>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// For inserting new plans (without id, timestamps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnnualPlan {
  pub patient_id: i64,
  pub title: String,
  pub start_date: String,
  pub end_date: Option<String>,
  pub weeks: BTreeMap<u32, WeekSchedule>,
}

/// A patient's season-long plan: validity window plus per-week prescriptions.
///
/// `start_date` is `None` when the stored value failed to parse; the validity
/// filter fails open on that state so a data defect never hides a session.
/// Week numbers are 1-based and derived from `start_date` only - a week's
/// calendar position is always `start_date + (week - 1) * 7 days`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualPlan {
  pub id: i64,
  pub patient_id: i64,
  pub title: String,
  pub start_date: Option<NaiveDate>,
  pub end_date: Option<NaiveDate>,
  pub weeks: BTreeMap<u32, WeekSchedule>,
}

impl AnnualPlan {
  /// Look up the schedule for a given 1-based week number
  pub fn week(&self, number: u32) -> Option<&WeekSchedule> {
    self.weeks.get(&number)
  }
}

/// The seven-day prescription for one week of a plan.
///
/// One field per weekday keeps the "exactly seven keys" invariant structural;
/// a day with no prescription is just an empty list. Order within a day is
/// execution order and is preserved as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekSchedule {
  #[serde(default)]
  pub monday: Vec<ScheduledExercise>,
  #[serde(default)]
  pub tuesday: Vec<ScheduledExercise>,
  #[serde(default)]
  pub wednesday: Vec<ScheduledExercise>,
  #[serde(default)]
  pub thursday: Vec<ScheduledExercise>,
  #[serde(default)]
  pub friday: Vec<ScheduledExercise>,
  #[serde(default)]
  pub saturday: Vec<ScheduledExercise>,
  #[serde(default)]
  pub sunday: Vec<ScheduledExercise>,
}

impl WeekSchedule {
  pub fn for_weekday(&self, weekday: Weekday) -> &[ScheduledExercise] {
    match weekday {
      Weekday::Mon => &self.monday,
      Weekday::Tue => &self.tuesday,
      Weekday::Wed => &self.wednesday,
      Weekday::Thu => &self.thursday,
      Weekday::Fri => &self.friday,
      Weekday::Sat => &self.saturday,
      Weekday::Sun => &self.sunday,
    }
  }
}

/// One prescribed exercise within a day's list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledExercise {
  /// Reference into the external exercise library
  pub exercise_id: String,
  pub name: String,
  pub prescription: Prescription,
}

/// Prescription variants. The scheduling core never interprets these fields;
/// they ride along for the plan editor and the portal display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prescription {
  Strength {
    sets: u32,
    reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_kg: Option<f64>,
  },
  Duration {
    seconds: u32,
  },
  Distance {
    meters: f64,
  },
}
