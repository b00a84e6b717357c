//! Connection pool over both storage backend flavors.

use std::sync::Once;

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

use crate::config::DatabaseConfig;
use crate::error::DbError;

/// Idempotent schema definition for the single ledger table.
///
/// All non-identity columns default to zero so a bare identity insert
/// produces a fully zero-valued row. The DDL is accepted verbatim by both
/// SQLite and MySQL.
const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS player_ledger (\
     identity VARCHAR(36) PRIMARY KEY, \
     balance DOUBLE DEFAULT 0, \
     tokens BIGINT DEFAULT 0, \
     shards BIGINT DEFAULT 0, \
     credits BIGINT DEFAULT 0, \
     level INT DEFAULT 0, \
     experience DOUBLE DEFAULT 0, \
     rebirths INT DEFAULT 0\
     )";

static INSTALL_DRIVERS: Once = Once::new();

/// Connection pool handle to the ledger database.
///
/// Wraps a [`sqlx::AnyPool`] so the embedded (SQLite) and networked (MySQL)
/// flavors share one interface. Owns connection lifecycle: acquisition
/// (with the configured timeout), idle reaping, recycling, and close.
#[derive(Clone)]
pub struct LedgerPool {
    pool: AnyPool,
}

impl LedgerPool {
    /// Connect to the configured backend and verify the pool works.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the connection fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let mut options = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout());

        // An in-memory SQLite database lives and dies with its connection;
        // never reap or recycle it.
        if !config.is_in_memory() {
            options = options
                .idle_timeout(Some(config.idle_timeout()))
                .max_lifetime(Some(config.max_lifetime()));
        }

        let pool = options.connect(&config.url()).await?;

        tracing::info!(
            backend = ?config.backend,
            max_connections = config.max_connections,
            "Connected to ledger database"
        );

        Ok(Self { pool })
    }

    /// Connect and create the `player_ledger` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if connecting or the DDL fails.
    pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<Self, DbError> {
        let ledger = Self::connect(config).await?;
        ledger.ensure_schema().await?;
        Ok(ledger)
    }

    /// Create the ledger table if it does not already exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), DbError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        tracing::info!("Ledger schema ensured");
        Ok(())
    }

    /// Return a reference to the underlying [`AnyPool`].
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Ledger database pool closed");
    }
}
