//! Exercise-library service client
//!
//! The clinic's exercise catalog (names, categories, required equipment)
//! lives in a separate service. This module is the only place that talks to
//! it; callers treat a missing exercise as "no metadata" rather than a hard
//! failure, since equipment display is best-effort.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LibraryConfig {
  pub base_url: String,
  pub token: Option<String>,
}

impl LibraryConfig {
  pub fn from_env() -> Result<Self, LibraryError> {
    Ok(Self {
      base_url: env::var("EXERCISE_LIBRARY_URL")
        .map_err(|_| LibraryError::MissingConfig("EXERCISE_LIBRARY_URL".into()))?,
      token: env::var("EXERCISE_LIBRARY_TOKEN").ok(),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid library URL: {0}")]
  InvalidUrl(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Library API error: {0}")]
  Api(String),
}

impl Serialize for LibraryError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Exercise Metadata
/// ---------------------------------------------------------------------------

/// Catalog entry for one exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseMetadata {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub equipment: Vec<String>,
  #[serde(default)]
  pub category: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Fetching
/// ---------------------------------------------------------------------------

fn exercise_endpoint(config: &LibraryConfig, exercise_id: &str) -> Result<Url, LibraryError> {
  let mut url =
    Url::parse(&config.base_url).map_err(|e| LibraryError::InvalidUrl(e.to_string()))?;
  url
    .path_segments_mut()
    .map_err(|_| LibraryError::InvalidUrl(config.base_url.clone()))?
    .pop_if_empty()
    .extend(["exercises", exercise_id]);
  Ok(url)
}

/// Fetch one exercise's metadata. `Ok(None)` means the library has no entry
/// for this id, which the caller treats the same as "no equipment needed".
pub async fn fetch_exercise(
  config: &LibraryConfig,
  exercise_id: &str,
) -> Result<Option<ExerciseMetadata>, LibraryError> {
  let client = Client::new();
  let url = exercise_endpoint(config, exercise_id)?;

  let mut request = client.get(url);
  if let Some(token) = &config.token {
    request = request.header("Authorization", format!("Bearer {}", token));
  }

  let response = request.send().await?;

  if response.status() == reqwest::StatusCode::NOT_FOUND {
    return Ok(None);
  }

  if !response.status().is_success() {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    return Err(LibraryError::Api(format!(
      "Lookup for {} failed ({}): {}",
      exercise_id, status, error_text
    )));
  }

  let metadata: ExerciseMetadata = response.json().await?;
  Ok(Some(metadata))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
