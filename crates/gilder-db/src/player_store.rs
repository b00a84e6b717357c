//! Row-level operations on the `player_ledger` table.
//!
//! Three statements cover the whole persistence contract: fetch one row by
//! identity, insert a default row for a never-seen identity, and overwrite
//! all seven value columns with the latest cached snapshot. Decimal fields
//! cross the row boundary as `DOUBLE`; everything in memory stays
//! [`Decimal`].

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};

use gilder_types::{PlayerId, PlayerLedgerRecord};

use crate::error::DbError;

/// Operations on the `player_ledger` table.
pub struct PlayerStore<'a> {
    pool: &'a AnyPool,
}

impl<'a> PlayerStore<'a> {
    /// Create a player store bound to a connection pool.
    pub const fn new(pool: &'a AnyPool) -> Self {
        Self { pool }
    }

    /// Fetch one player's row, if it exists.
    ///
    /// Loaded values are clamped to the non-negative floor; rows written by
    /// older deployments could hold negatives.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn fetch(&self, id: PlayerId) -> Result<Option<PlayerLedgerRecord>, DbError> {
        let row = sqlx::query(
            "SELECT balance, tokens, shards, credits, level, experience, rebirths \
             FROM player_ledger WHERE identity = ?",
        )
        .bind(id.storage_key())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| record_from_row(&r)).transpose()
    }

    /// Insert a default (all-zero) row for `id`.
    ///
    /// Returns `Ok(true)` if the row was created and `Ok(false)` if a row
    /// already existed -- the identity column is the primary key, so a
    /// duplicate insert from a concurrent first access loses cleanly and is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] for failures other than a duplicate key.
    pub async fn insert_default(&self, id: PlayerId) -> Result<bool, DbError> {
        let result = sqlx::query("INSERT INTO player_ledger (identity) VALUES (?)")
            .bind(id.storage_key())
            .execute(self.pool)
            .await;

        match result {
            Ok(_) => {
                tracing::debug!(player = %id, "Created ledger row");
                Ok(true)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::debug!(player = %id, "Ledger row already existed, insert ignored");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite all value columns of one player's row with `record`.
    ///
    /// A missing row (a default insert dropped by an earlier storage
    /// failure) makes this affect zero rows; the write is lost until the
    /// next flush, which is the accepted eventual-consistency gap.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the update fails.
    pub async fn save(&self, id: PlayerId, record: &PlayerLedgerRecord) -> Result<(), DbError> {
        sqlx::query(
            "UPDATE player_ledger SET balance = ?, tokens = ?, shards = ?, \
             credits = ?, level = ?, experience = ?, rebirths = ? \
             WHERE identity = ?",
        )
        .bind(decimal_to_column(record.balance))
        .bind(record.tokens)
        .bind(record.shards)
        .bind(record.credits)
        .bind(i64::from(record.level))
        .bind(decimal_to_column(record.experience))
        .bind(i64::from(record.rebirths))
        .bind(id.storage_key())
        .execute(self.pool)
        .await?;

        tracing::debug!(player = %id, "Saved ledger row");
        Ok(())
    }
}

/// Convert a decimal field to its `DOUBLE` column representation.
fn decimal_to_column(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Build a record from one fetched row, clamped to non-negative values.
fn record_from_row(row: &AnyRow) -> Result<PlayerLedgerRecord, DbError> {
    let balance: f64 = row.try_get("balance")?;
    let tokens: i64 = row.try_get("tokens")?;
    let shards: i64 = row.try_get("shards")?;
    let credits: i64 = row.try_get("credits")?;
    let level: i64 = row.try_get("level")?;
    let experience: f64 = row.try_get("experience")?;
    let rebirths: i64 = row.try_get("rebirths")?;

    let mut record = PlayerLedgerRecord {
        balance: Decimal::from_f64_retain(balance).unwrap_or_default(),
        tokens,
        shards,
        credits,
        level: i32::try_from(level).unwrap_or(i32::MAX),
        experience: Decimal::from_f64_retain(experience).unwrap_or_default(),
        rebirths: i32::try_from(rebirths).unwrap_or(i32::MAX),
    };
    record.clamp_non_negative();
    Ok(record)
}
