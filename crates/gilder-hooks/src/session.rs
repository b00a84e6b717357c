//! Session lifecycle notifications.
//!
//! The host process tells the economy when a player's session starts and
//! ends and when the process itself is going down. Joining warms the cache
//! so the player's first command never waits on storage; leaving schedules
//! a write of whatever the session changed; shutdown flushes everything
//! synchronously and closes the pool.

use gilder_ledger::Economy;
use gilder_types::PlayerId;

/// Lifecycle adapter over the economy.
#[derive(Clone)]
pub struct SessionHooks {
    economy: Economy,
}

impl SessionHooks {
    /// Create the lifecycle adapter.
    pub fn new(economy: Economy) -> Self {
        Self { economy }
    }

    /// A player's session started: load their record into the cache.
    pub async fn player_joined(&self, id: PlayerId) {
        self.economy.store().preload(id).await;
        tracing::debug!(player = %id, "Player session started, ledger record cached");
    }

    /// A player's session ended: schedule a write of their current record.
    ///
    /// The record stays cached; a rejoin within the process lifetime reuses
    /// it. An identity that was never cached has nothing to write.
    pub async fn player_left(&self, id: PlayerId) {
        if self.economy.store().snapshot(id).await.is_some() {
            self.economy.store().update(id, |_| ()).await;
            tracing::debug!(player = %id, "Player session ended, ledger write scheduled");
        }
    }

    /// The process is going down: flush every cached record and close the
    /// storage pool. Blocks until persistence settles.
    pub async fn shutdown(&self) {
        tracing::info!("Saving all player ledger records before shutdown");
        self.economy.shutdown().await;
        tracing::info!("Player ledger shutdown complete");
    }
}
