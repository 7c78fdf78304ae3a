//! Equipment aggregation for a resolved day
//!
//! Looks up each scheduled exercise in the external library and merges the
//! required equipment into one set for the "what to prepare" panel. Lookups
//! are independent and fan out concurrently; any that fail simply contribute
//! nothing, because equipment display must never block the schedule itself.

use std::collections::{BTreeSet, HashSet};
use tokio::task::JoinSet;
use tracing::debug;

use crate::library::{fetch_exercise, LibraryConfig};
use crate::models::ScheduledExercise;

/// Reserved catalog value meaning "no equipment needed"; filtered out of
/// every aggregated set
pub const NO_EQUIPMENT_SENTINEL: &str = "Sin Implemento";

/// ---------------------------------------------------------------------------
/// Pure Aggregation
/// ---------------------------------------------------------------------------

/// Merge per-exercise equipment lists into a deduplicated set, excluding the
/// no-equipment sentinel. Commutative over its input, so lookup completion
/// order never changes the result.
pub fn collect_equipment<I>(lists: I) -> BTreeSet<String>
where
  I: IntoIterator<Item = Vec<String>>,
{
  lists
    .into_iter()
    .flatten()
    .filter(|item| item.as_str() != NO_EQUIPMENT_SENTINEL)
    .collect()
}

/// ---------------------------------------------------------------------------
/// Concurrent Lookup Fan-Out
/// ---------------------------------------------------------------------------

/// Aggregate the equipment needed for a day's exercises.
///
/// Distinct exercise ids are looked up concurrently and joined; a failed or
/// empty lookup contributes nothing. Dropping the returned future mid-flight
/// is safe - abandoned lookups mutate no shared state.
pub async fn aggregate_equipment(
  config: &LibraryConfig,
  exercises: &[ScheduledExercise],
) -> BTreeSet<String> {
  let mut seen = HashSet::new();
  let mut lookups = JoinSet::new();

  for exercise in exercises {
    if !seen.insert(exercise.exercise_id.clone()) {
      continue;
    }
    let config = config.clone();
    let exercise_id = exercise.exercise_id.clone();
    lookups.spawn(async move { fetch_exercise(&config, &exercise_id).await });
  }

  let mut lists = Vec::new();
  while let Some(joined) = lookups.join_next().await {
    match joined {
      Ok(Ok(Some(metadata))) => lists.push(metadata.equipment),
      Ok(Ok(None)) => {}
      Ok(Err(e)) => debug!("equipment lookup failed: {}", e),
      Err(e) => debug!("equipment lookup task aborted: {}", e),
    }
  }

  collect_equipment(lists)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::mock_scheduled_exercise;

  #[test]
  fn test_collect_equipment_excludes_sentinel() {
    let lists = vec![
      vec!["Banda elástica".to_string(), NO_EQUIPMENT_SENTINEL.to_string()],
      vec!["Banda elástica".to_string()],
    ];

    let equipment = collect_equipment(lists);

    assert_eq!(equipment.len(), 1);
    assert!(equipment.contains("Banda elástica"));
  }

  #[test]
  fn test_collect_equipment_all_sentinel_is_empty() {
    let lists = vec![
      vec![NO_EQUIPMENT_SENTINEL.to_string()],
      vec![NO_EQUIPMENT_SENTINEL.to_string()],
    ];

    assert!(collect_equipment(lists).is_empty());
  }

  #[test]
  fn test_collect_equipment_is_order_independent() {
    let forward = vec![
      vec!["Mancuernas".to_string(), "Colchoneta".to_string()],
      vec!["Banda elástica".to_string()],
    ];
    let reversed = vec![
      vec!["Banda elástica".to_string()],
      vec!["Colchoneta".to_string(), "Mancuernas".to_string()],
    ];

    assert_eq!(collect_equipment(forward), collect_equipment(reversed));
  }

  #[tokio::test]
  async fn test_aggregate_equipment_merges_lookups() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/exercises/ex-row")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"{"id":"ex-row","name":"Remo","equipment":["Banda elástica","Sin Implemento"]}"#,
      )
      .create_async()
      .await;
    let _mock = server
      .mock("GET", "/exercises/ex-squat")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id":"ex-squat","name":"Sentadilla","equipment":["Banda elástica"]}"#)
      .create_async()
      .await;

    let config = LibraryConfig {
      base_url: server.url(),
      token: None,
    };
    let exercises = vec![
      mock_scheduled_exercise("ex-row"),
      mock_scheduled_exercise("ex-squat"),
    ];

    let equipment = aggregate_equipment(&config, &exercises).await;

    assert_eq!(equipment.into_iter().collect::<Vec<_>>(), vec!["Banda elástica"]);
  }

  #[tokio::test]
  async fn test_aggregate_equipment_tolerates_failed_lookups() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("GET", "/exercises/ex-known")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id":"ex-known","name":"Plancha","equipment":["Colchoneta"]}"#)
      .create_async()
      .await;
    let _mock = server
      .mock("GET", "/exercises/ex-missing")
      .with_status(404)
      .create_async()
      .await;
    let _mock = server
      .mock("GET", "/exercises/ex-broken")
      .with_status(500)
      .create_async()
      .await;

    let config = LibraryConfig {
      base_url: server.url(),
      token: None,
    };
    let exercises = vec![
      mock_scheduled_exercise("ex-known"),
      mock_scheduled_exercise("ex-missing"),
      mock_scheduled_exercise("ex-broken"),
    ];

    let equipment = aggregate_equipment(&config, &exercises).await;

    assert_eq!(equipment.into_iter().collect::<Vec<_>>(), vec!["Colchoneta"]);
  }

  #[tokio::test]
  async fn test_aggregate_equipment_deduplicates_exercise_ids() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/exercises/ex-row")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"id":"ex-row","name":"Remo","equipment":["Banda elástica"]}"#)
      .expect(1)
      .create_async()
      .await;

    let config = LibraryConfig {
      base_url: server.url(),
      token: None,
    };
    // Same exercise prescribed twice in one day: one lookup, not two
    let exercises = vec![
      mock_scheduled_exercise("ex-row"),
      mock_scheduled_exercise("ex-row"),
    ];

    let equipment = aggregate_equipment(&config, &exercises).await;

    assert!(equipment.contains("Banda elástica"));
    mock.assert_async().await;
  }
}
