//! Clinic plan scheduling library
//!
//! Computes, from a patient's stored annual plan and session logs, the
//! derived calendar view the clinic UI renders: what is scheduled on a date,
//! whether it was completed, missed, upcoming, or a rest day, and what
//! equipment the day needs. The scheduling rules live in [`schedule`] as pure
//! functions; [`portal`] joins them with persistence for the host application.

pub mod db;
pub mod equipment;
pub mod library;
pub mod models;
pub mod plans;
pub mod portal;
pub mod schedule;
pub mod sessions;

#[cfg(test)]
mod test_utils;

pub use equipment::{aggregate_equipment, collect_equipment, NO_EQUIPMENT_SENTINEL};
pub use schedule::{classify, is_active_on, resolve_day, week_number, DayStatus};

/// Wire up the default host environment: `.env` loading plus a tracing
/// subscriber driven by `RUST_LOG`. Call once from the embedding application;
/// hosts with their own subscriber can skip this and configure directly.
pub fn init() {
  dotenvy::dotenv().ok();

  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
