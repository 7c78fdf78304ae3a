use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A record asserting that a session happened on a given calendar day.
///
/// `date` is the patient-local day the session counts toward - the only field
/// the reconciler ever compares. `completed_at` keeps the UTC instant for
/// audit purposes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionLog {
  pub id: i64,
  pub patient_id: i64,
  pub date: NaiveDate,
  pub completed_at: Option<DateTime<Utc>>,
  pub notes: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
}

/// For inserting new session logs (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionLog {
  pub patient_id: i64,
  pub date: NaiveDate,
  pub completed_at: Option<DateTime<Utc>>,
  pub notes: Option<String>,
}
