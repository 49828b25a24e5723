use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::store::PortfolioStore;

/// Errors from the portfolio store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Schema applied on startup. Each statement is idempotent.
const MIGRATIONS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS admin_credentials (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        singleton BOOLEAN NOT NULL DEFAULT TRUE UNIQUE CHECK (singleton),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS portfolio_sections (
        name TEXT PRIMARY KEY,
        document JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS portfolio_items (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        position BIGINT NOT NULL DEFAULT 0,
        seq BIGSERIAL,
        document JSONB NOT NULL,
        PRIMARY KEY (collection, id)
    )"#,
    r#"CREATE INDEX IF NOT EXISTS portfolio_items_order_idx
        ON portfolio_items (collection, position, seq)"#,
];

/// Builds the store selected by configuration.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the configured store. `memory` yields an in-process store,
    /// anything else is treated as a postgres URL and migrated on connect.
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn PortfolioStore>, DatabaseError> {
        if config.url.eq_ignore_ascii_case("memory") {
            info!("Using in-memory portfolio store");
            let store: Arc<dyn PortfolioStore> = Arc::new(MemoryStore::new());
            return Ok(store);
        }

        let display_url = Self::redacted_url(&config.url)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        Self::migrate(&pool).await?;
        info!("Connected to database: {}", display_url);

        let store: Arc<dyn PortfolioStore> = Arc::new(PgStore::new(pool));
        Ok(store)
    }

    async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        }
        Ok(())
    }

    /// Strip credentials from a database URL so it can be logged.
    fn redacted_url(raw: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !url.username().is_empty() {
            url.set_username("***").map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        if url.password().is_some() {
            url.set_password(Some("***")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
