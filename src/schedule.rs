//! Deterministic scheduling core for annual plans
//!
//! Maps a plan's per-week prescriptions onto calendar dates and reconciles
//! them against logged sessions. Everything here is pure: callers supply the
//! plan, the target date, and "today" explicitly, so every result is
//! reproducible in tests.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{AnnualPlan, ScheduledExercise};

/// ---------------------------------------------------------------------------
/// Day Status
/// ---------------------------------------------------------------------------

/// Classification of one calendar day against a plan and its session logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
  /// A session was scheduled and a log exists for that day
  Completed,
  /// Scheduled, strictly in the past, and never logged
  Missed,
  /// Scheduled, today or later, not yet logged
  Upcoming,
  /// Nothing scheduled, or the plan is not active on that day
  Rest,
}

impl DayStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      DayStatus::Completed => "completed",
      DayStatus::Missed => "missed",
      DayStatus::Upcoming => "upcoming",
      DayStatus::Rest => "rest",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Calendar Week Indexing
/// ---------------------------------------------------------------------------

/// Truncate a date to the Monday of its week
pub fn week_start(date: NaiveDate) -> NaiveDate {
  date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// 1-based week number of `target` within a plan anchored at `plan_start`.
///
/// Both dates are truncated to their Monday week-start before comparison;
/// comparing the raw dates drifts by one near week boundaries whenever the
/// plan does not start on a Monday. Only defined for `target >= plan_start`
/// (callers guard the earlier case; the result there is non-positive).
pub fn week_number(plan_start: NaiveDate, target: NaiveDate) -> i64 {
  let days = (week_start(target) - week_start(plan_start)).num_days();
  days.div_euclid(7) + 1
}

/// Map the UI's Sunday=0 weekday index onto chrono's weekday
pub fn weekday_from_sunday_index(index: u32) -> Option<Weekday> {
  match index {
    0 => Some(Weekday::Sun),
    1 => Some(Weekday::Mon),
    2 => Some(Weekday::Tue),
    3 => Some(Weekday::Wed),
    4 => Some(Weekday::Thu),
    5 => Some(Weekday::Fri),
    6 => Some(Weekday::Sat),
    _ => None,
  }
}

/// ---------------------------------------------------------------------------
/// Day Schedule Resolution
/// ---------------------------------------------------------------------------

/// The exercises prescribed for `target`, in stored order.
///
/// Missing week data is a normal state, not an error: a plan with no entry
/// for the target's week (or a target before the plan anchor) resolves to an
/// empty list, which downstream classification reads as a rest day.
pub fn resolve_day(plan: &AnnualPlan, target: NaiveDate) -> &[ScheduledExercise] {
  let start = match plan.start_date {
    Some(start) => start,
    None => return &[],
  };
  if target < start {
    return &[];
  }

  let week = week_number(start, target);
  let schedule = match u32::try_from(week).ok().and_then(|w| plan.week(w)) {
    Some(schedule) => schedule,
    None => return &[],
  };

  schedule.for_weekday(target.weekday())
}

/// ---------------------------------------------------------------------------
/// Plan Validity Window
/// ---------------------------------------------------------------------------

/// Whether `target` falls inside the plan's validity window.
///
/// Both boundaries are inclusive at calendar-day granularity. A plan whose
/// start date failed to parse fails OPEN: a date-parsing defect must never
/// silently hide a prescribed session, so the plan is treated as active and
/// the load path is expected to have logged the bad value.
pub fn is_active_on(plan: &AnnualPlan, target: NaiveDate) -> bool {
  if let Some(start) = plan.start_date {
    if target < start {
      return false;
    }
  }
  if let Some(end) = plan.end_date {
    if target > end {
      return false;
    }
  }
  true
}

/// ---------------------------------------------------------------------------
/// Completion Reconciliation
/// ---------------------------------------------------------------------------

/// Classify one calendar day.
///
/// `completed_days` holds calendar-day keys, never instants, so late-night
/// logs and duplicate logs on the same day cannot produce false negatives.
/// `today` is passed in rather than read from the clock; today itself is
/// never `Missed` regardless of time of day.
pub fn classify(
  target: NaiveDate,
  has_scheduled: bool,
  is_active: bool,
  completed_days: &HashSet<NaiveDate>,
  today: NaiveDate,
) -> DayStatus {
  if !has_scheduled || !is_active {
    return DayStatus::Rest;
  }
  if completed_days.contains(&target) {
    return DayStatus::Completed;
  }
  if target < today {
    return DayStatus::Missed;
  }
  DayStatus::Upcoming
}

/// ---------------------------------------------------------------------------
/// Boundary Date Normalization
/// ---------------------------------------------------------------------------

/// Parse a stored plan date into the one canonical calendar-day type.
///
/// The plan editor has historically written plain dates, full timestamps, and
/// day-first locale dates; everything funnels through here once at load time
/// so the core only ever sees `NaiveDate`.
pub fn parse_plan_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    return Some(date);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.date_naive());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
    return Some(dt.date());
  }
  NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
