//! The in-memory ledger record cached per player.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One player's complete ledger state.
///
/// Exactly one of these exists per identity in storage, and at most one
/// cached copy exists per identity in memory. Once cached, the in-memory
/// copy is the single source of truth for the rest of the process lifetime;
/// storage only ever receives snapshots of it.
///
/// All fields are non-negative. Monetary quantities ([`Decimal`]) stay
/// decimal until the storage row boundary, where the schema uses `DOUBLE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLedgerRecord {
    /// Cash balance.
    pub balance: Decimal,
    /// Token counter.
    pub tokens: i64,
    /// Shard counter.
    pub shards: i64,
    /// Credit counter.
    pub credits: i64,
    /// Progression level, floored by experience gain, lowered only by
    /// explicit administrative operations.
    pub level: i32,
    /// Accumulated experience points.
    pub experience: Decimal,
    /// Completed rebirth count.
    pub rebirths: i32,
}

impl PlayerLedgerRecord {
    /// A record with every field at zero -- the state a never-seen player
    /// starts in, and the state storage rows default to.
    pub const fn zeroed() -> Self {
        Self {
            balance: Decimal::ZERO,
            tokens: 0,
            shards: 0,
            credits: 0,
            level: 0,
            experience: Decimal::ZERO,
            rebirths: 0,
        }
    }

    /// Clamp every field to its non-negative floor.
    ///
    /// Rows written by older deployments could hold negative values; loading
    /// normalizes them so the in-memory invariant holds from the start.
    pub fn clamp_non_negative(&mut self) {
        self.balance = self.balance.max(Decimal::ZERO);
        self.tokens = self.tokens.max(0);
        self.shards = self.shards.max(0);
        self.credits = self.credits.max(0);
        self.level = self.level.max(0);
        self.experience = self.experience.max(Decimal::ZERO);
        self.rebirths = self.rebirths.max(0);
    }
}

impl Default for PlayerLedgerRecord {
    fn default() -> Self {
        Self::zeroed()
    }
}
