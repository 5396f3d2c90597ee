#![allow(dead_code)]

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use todo_api::database::DatabaseManager;

/// Connects to `DATABASE_URL` and applies migrations.
/// Returns `None` when no database is configured so the suite can be skipped.
pub async fn test_pool() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();

    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database tests");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .context("failed to connect to DATABASE_URL")?;
    DatabaseManager::run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    Ok(Some(pool))
}

/// Value unique to this run, for usernames and marker titles
pub fn unique(prefix: &str) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}
