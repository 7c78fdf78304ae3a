use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::env;
use tracing::info;

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool
pub struct AppState {
  pub db: DbPool,
}

/// Database file path: FISIO_PLAN_DB when set, otherwise a file next to the
/// host process
fn db_path() -> String {
  env::var("FISIO_PLAN_DB").unwrap_or_else(|_| "fisio-plan.db".to_string())
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db() -> Result<DbPool, Box<dyn std::error::Error>> {
  let db_path = db_path();
  let db_url = format!("sqlite://{}?mode=rwc", db_path);

  info!("Initializing database at: {}", db_path);

  // Create connection pool
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  // Run migrations
  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database ready");

  Ok(pool)
}
