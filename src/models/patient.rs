use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Patient {
  pub id: i64,
  pub name: String,
  pub email: Option<String>,
  pub notes: Option<String>,
  pub active: Option<bool>,
  pub created_at: Option<DateTime<Utc>>,
}

/// For inserting new patients (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
  pub name: String,
  pub email: Option<String>,
  pub notes: Option<String>,
}
