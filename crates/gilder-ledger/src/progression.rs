//! Level and rebirth progression rules.
//!
//! The rule functions are pure; the [`Progression`] service applies them
//! through the ledger store so every outcome is one cached mutation and one
//! persisted write.
//!
//! # Rules
//!
//! - One level per 100 experience points: `level = floor(xp / 100)`.
//!   Experience gain only ever raises the stored level; explicit
//!   administrative set/remove operations are the only way down.
//! - Rebirth `n` requires level `50 + 50 * n`. Performing a rebirth
//!   increments the rebirth count and resets level and experience to zero
//!   as one logical update.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use gilder_types::PlayerId;

use crate::store::LedgerStore;

/// Experience points required per level.
pub const XP_PER_LEVEL: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Level required for the first rebirth.
pub const BASE_REBIRTH_LEVEL: i32 = 50;

/// Additional levels required per completed rebirth.
pub const REBIRTH_LEVEL_INCREMENT: i32 = 50;

/// The level a given experience total corresponds to. Never negative.
pub fn level_for_experience(experience: Decimal) -> i32 {
    let levels = (experience / XP_PER_LEVEL).floor();
    levels.to_i32().unwrap_or(i32::MAX).max(0)
}

/// The level required for the next rebirth after `rebirths` completed ones.
pub fn required_level(rebirths: i32) -> i32 {
    BASE_REBIRTH_LEVEL.saturating_add(rebirths.max(0).saturating_mul(REBIRTH_LEVEL_INCREMENT))
}

/// How many levels remain until `required` is reached. Zero when already
/// eligible.
pub fn levels_until(current: i32, required: i32) -> i32 {
    required.saturating_sub(current).max(0)
}

/// Facade over level, experience, and rebirth state.
#[derive(Clone)]
pub struct Progression {
    store: Arc<LedgerStore>,
}

impl Progression {
    /// Create the progression facade over a ledger store.
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    // -- Levels ----------------------------------------------------------

    /// Current level.
    pub async fn level(&self, id: PlayerId) -> i32 {
        self.store.read(id, |r| r.level).await
    }

    /// Administratively set the level. Negative targets floor to zero.
    /// This path may lower a level; experience gain never does.
    pub async fn set_level(&self, id: PlayerId, level: i32) {
        let level = level.max(0);
        self.store.update(id, |r| r.level = level).await;
    }

    /// Add levels.
    pub async fn add_levels(&self, id: PlayerId, amount: i32) {
        self.store
            .update(id, |r| r.level = r.level.saturating_add(amount).max(0))
            .await;
    }

    /// Remove levels if the player has at least `amount`; reports whether
    /// the removal happened.
    pub async fn remove_levels(&self, id: PlayerId, amount: i32) -> bool {
        self.store
            .update(id, |r| {
                if r.level >= amount {
                    r.level = r.level.saturating_sub(amount).max(0);
                    true
                } else {
                    false
                }
            })
            .await
    }

    /// Whether the player is at least `level`.
    pub async fn has_level(&self, id: PlayerId, level: i32) -> bool {
        self.level(id).await >= level
    }

    /// Reset the level to zero.
    pub async fn reset_level(&self, id: PlayerId) {
        self.set_level(id, 0).await;
    }

    // -- Experience ------------------------------------------------------

    /// Current experience.
    pub async fn experience(&self, id: PlayerId) -> Decimal {
        self.store.read(id, |r| r.experience).await
    }

    /// Accrue experience (negative deltas floor at zero) and raise the
    /// level to `floor(xp / 100)` when that exceeds the stored level.
    ///
    /// The accrual and any level raise are one mutation and one persisted
    /// write.
    pub async fn add_experience(&self, id: PlayerId, delta: Decimal) {
        self.store
            .update(id, |r| {
                r.experience = r.experience.saturating_add(delta).max(Decimal::ZERO);
                let candidate = level_for_experience(r.experience);
                if candidate > r.level {
                    r.level = candidate;
                }
            })
            .await;
    }

    // -- Rebirths --------------------------------------------------------

    /// Completed rebirth count.
    pub async fn rebirths(&self, id: PlayerId) -> i32 {
        self.store.read(id, |r| r.rebirths).await
    }

    /// Administratively set the rebirth count. Negative targets floor to
    /// zero.
    pub async fn set_rebirths(&self, id: PlayerId, amount: i32) {
        let amount = amount.max(0);
        self.store.update(id, |r| r.rebirths = amount).await;
    }

    /// Add rebirths without the eligibility check (administrative).
    pub async fn add_rebirths(&self, id: PlayerId, amount: i32) {
        self.store
            .update(id, |r| r.rebirths = r.rebirths.saturating_add(amount).max(0))
            .await;
    }

    /// Reset the rebirth count to zero.
    pub async fn reset_rebirths(&self, id: PlayerId) {
        self.set_rebirths(id, 0).await;
    }

    /// The level required for this player's next rebirth.
    pub async fn required_level_for(&self, id: PlayerId) -> i32 {
        self.store.read(id, |r| required_level(r.rebirths)).await
    }

    /// Whether the player currently meets the rebirth requirement.
    pub async fn can_rebirth(&self, id: PlayerId) -> bool {
        self.store
            .read(id, |r| r.level >= required_level(r.rebirths))
            .await
    }

    /// Levels remaining until the player can rebirth.
    pub async fn levels_until_rebirth(&self, id: PlayerId) -> i32 {
        self.store
            .read(id, |r| levels_until(r.level, required_level(r.rebirths)))
            .await
    }

    /// Perform a rebirth if eligible: rebirth count up by one, level and
    /// experience reset to zero, all as one record write. Reports whether
    /// the rebirth happened.
    ///
    /// The eligibility check and the three-field reset run under the
    /// identity's lock, so a concurrent caller cannot observe a
    /// half-rebirthed record or double-spend the eligibility.
    pub async fn rebirth(&self, id: PlayerId) -> bool {
        self.store
            .update(id, |r| {
                if r.level >= required_level(r.rebirths) {
                    r.rebirths = r.rebirths.saturating_add(1);
                    r.level = 0;
                    r.experience = Decimal::ZERO;
                    true
                } else {
                    false
                }
            })
            .await
    }
}
