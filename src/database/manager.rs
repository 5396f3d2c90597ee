use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors surfaced by the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid sslmode: {0}")]
    InvalidSslMode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Update requires at least one field")]
    EmptyUpdate,

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Folds a Postgres `unique_violation` (SQLSTATE 23505) into `UniqueViolation`
    pub fn classify(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return DatabaseError::UniqueViolation(constraint);
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Builds the connection pool and applies the schema
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let options = Self::connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Created database pool"
        );
        Ok(pool)
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections to return
    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }

    fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DatabaseError> {
        if let Some(url) = &config.url {
            return PgConnectOptions::from_str(url).map_err(|_| DatabaseError::InvalidDatabaseUrl);
        }

        let ssl_mode = PgSslMode::from_str(&config.sslmode)
            .map_err(|_| DatabaseError::InvalidSslMode(config.sslmode.clone()))?;

        Ok(PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.dbname)
            .ssl_mode(ssl_mode))
    }
}
