//! Typed currency facades over the ledger store.
//!
//! Every plain counter speaks the same contract -- get, floor-at-zero set,
//! add, sufficiency-checked remove, has, reset, transfer -- so one generic
//! [`Currency`] covers all four, instantiated per [`CurrencyField`] marker.
//! [`Economy`] bundles the instantiations plus [`Progression`] and is the
//! single value handed to front-ends and adapters; nothing looks services
//! up through ambient globals.

use std::marker::PhantomData;
use std::sync::Arc;

use gilder_db::LedgerPool;
use gilder_types::{
    Amount, BalanceField, CreditField, CurrencyField, PlayerId, ShardField, TokenField,
};

use crate::progression::Progression;
use crate::store::LedgerStore;

/// One currency's typed service facade.
pub struct Currency<K: CurrencyField> {
    store: Arc<LedgerStore>,
    _field: PhantomData<K>,
}

// Derived Clone would demand K: Clone; the marker is never stored.
impl<K: CurrencyField> Clone for Currency<K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _field: PhantomData,
        }
    }
}

impl<K: CurrencyField> Currency<K> {
    /// Create the facade over a ledger store.
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self {
            store,
            _field: PhantomData,
        }
    }

    /// Current balance of this currency.
    pub async fn get(&self, id: PlayerId) -> K::Amount {
        self.store.read(id, K::get).await
    }

    /// Set the balance. Negative targets silently floor to zero.
    pub async fn set(&self, id: PlayerId, value: K::Amount) {
        let value = value.floor_zero();
        self.store.update(id, |r| K::set(r, value)).await;
    }

    /// Add to the balance (a negative amount subtracts, floored at zero).
    pub async fn add(&self, id: PlayerId, amount: K::Amount) {
        self.store
            .update(id, |r| {
                let next = K::get(r).saturating_add(amount).floor_zero();
                K::set(r, next);
            })
            .await;
    }

    /// Remove `amount` if the balance covers it; reports whether the
    /// removal happened. An insufficient balance is left untouched.
    ///
    /// The sufficiency check and the decrement run under the identity's
    /// lock, so concurrent removes cannot both pass the check and
    /// over-withdraw.
    pub async fn remove(&self, id: PlayerId, amount: K::Amount) -> bool {
        self.store
            .update(id, |r| {
                let current = K::get(r);
                if current >= amount {
                    K::set(r, current.saturating_sub(amount).floor_zero());
                    true
                } else {
                    false
                }
            })
            .await
    }

    /// Whether the balance is at least `amount`.
    pub async fn has(&self, id: PlayerId, amount: K::Amount) -> bool {
        self.get(id).await >= amount
    }

    /// Reset the balance to zero.
    pub async fn reset(&self, id: PlayerId) {
        self.set(id, K::Amount::ZERO).await;
    }

    /// Move `amount` from `from` to `to`. When the sender cannot cover it,
    /// neither side changes and `false` is returned.
    pub async fn transfer(&self, from: PlayerId, to: PlayerId, amount: K::Amount) -> bool {
        if self.remove(from, amount).await {
            self.add(to, amount).await;
            true
        } else {
            false
        }
    }

    /// The balance rendered the way this currency displays.
    pub async fn formatted(&self, id: PlayerId) -> String {
        K::format(self.get(id).await)
    }
}

/// The fully-wired economy: every currency service plus progression,
/// sharing one [`LedgerStore`].
///
/// Constructed once at process start and passed by reference to whoever
/// needs it (command front-end, adapters) -- explicit dependency injection
/// in place of a global service registry.
#[derive(Clone)]
pub struct Economy {
    store: Arc<LedgerStore>,
    /// Cash balance service.
    pub balance: Currency<BalanceField>,
    /// Token counter service.
    pub tokens: Currency<TokenField>,
    /// Shard counter service.
    pub shards: Currency<ShardField>,
    /// Credit counter service.
    pub credits: Currency<CreditField>,
    /// Level, experience, and rebirth service.
    pub progression: Progression,
}

impl Economy {
    /// Build the economy over an already-connected pool.
    pub fn new(pool: LedgerPool) -> Self {
        Self::with_store(Arc::new(LedgerStore::new(pool)))
    }

    /// Build the economy over an existing store (shared with tests or
    /// other facades).
    pub fn with_store(store: Arc<LedgerStore>) -> Self {
        Self {
            balance: Currency::new(Arc::clone(&store)),
            tokens: Currency::new(Arc::clone(&store)),
            shards: Currency::new(Arc::clone(&store)),
            credits: Currency::new(Arc::clone(&store)),
            progression: Progression::new(Arc::clone(&store)),
            store,
        }
    }

    /// The shared ledger store.
    pub const fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// Flush every cached record and close the storage pool.
    pub async fn shutdown(&self) {
        self.store.shutdown().await;
    }
}

#[cfg(test)]
// Tests use expect for clarity -- panicking on failure is the correct
// behavior in test code.
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use gilder_db::DatabaseConfig;
    use rust_decimal::Decimal;

    async fn economy() -> Economy {
        let pool = LedgerPool::connect_and_migrate(&DatabaseConfig::sqlite_in_memory())
            .await
            .expect("in-memory connect failed");
        Economy::new(pool)
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let eco = economy().await;
        let id = PlayerId::new();

        eco.tokens.set(id, 120).await;
        assert_eq!(eco.tokens.get(id).await, 120);
    }

    #[tokio::test]
    async fn negative_set_floors_to_zero() {
        let eco = economy().await;
        let id = PlayerId::new();

        eco.balance.set(id, Decimal::new(-500, 2)).await;
        assert_eq!(eco.balance.get(id).await, Decimal::ZERO);

        eco.shards.set(id, -3).await;
        assert_eq!(eco.shards.get(id).await, 0);
    }

    #[tokio::test]
    async fn add_accumulates_and_floors() {
        let eco = economy().await;
        let id = PlayerId::new();

        eco.credits.add(id, 10).await;
        eco.credits.add(id, 5).await;
        assert_eq!(eco.credits.get(id).await, 15);

        // Subtracting past zero floors instead of going negative.
        eco.credits.add(id, -40).await;
        assert_eq!(eco.credits.get(id).await, 0);
    }

    #[tokio::test]
    async fn remove_checks_sufficiency() {
        let eco = economy().await;
        let id = PlayerId::new();

        eco.tokens.set(id, 30).await;
        assert!(!eco.tokens.remove(id, 31).await);
        assert_eq!(eco.tokens.get(id).await, 30);

        assert!(eco.tokens.remove(id, 30).await);
        assert_eq!(eco.tokens.get(id).await, 0);
    }

    #[tokio::test]
    async fn has_compares_inclusively() {
        let eco = economy().await;
        let id = PlayerId::new();

        eco.balance.set(id, Decimal::new(100, 0)).await;
        assert!(eco.balance.has(id, Decimal::new(100, 0)).await);
        assert!(!eco.balance.has(id, Decimal::new(101, 0)).await);
    }

    #[tokio::test]
    async fn reset_is_idempotent() {
        let eco = economy().await;
        let id = PlayerId::new();

        eco.shards.set(id, 40).await;
        eco.shards.reset(id).await;
        assert_eq!(eco.shards.get(id).await, 0);
        eco.shards.reset(id).await;
        assert_eq!(eco.shards.get(id).await, 0);
    }

    #[tokio::test]
    async fn transfer_moves_funds_or_nothing() {
        let eco = economy().await;
        let sender = PlayerId::new();
        let receiver = PlayerId::new();

        eco.balance.set(sender, Decimal::new(75, 0)).await;

        assert!(eco.balance.transfer(sender, receiver, Decimal::new(50, 0)).await);
        assert_eq!(eco.balance.get(sender).await, Decimal::new(25, 0));
        assert_eq!(eco.balance.get(receiver).await, Decimal::new(50, 0));

        // Insufficient funds: a no-op on both sides.
        assert!(!eco.balance.transfer(sender, receiver, Decimal::new(26, 0)).await);
        assert_eq!(eco.balance.get(sender).await, Decimal::new(25, 0));
        assert_eq!(eco.balance.get(receiver).await, Decimal::new(50, 0));
    }

    #[tokio::test]
    async fn formatted_balances_use_currency_styles() {
        let eco = economy().await;
        let id = PlayerId::new();

        eco.balance.set(id, Decimal::new(1_234_56, 2)).await;
        eco.tokens.set(id, 1_500).await;

        assert_eq!(eco.balance.formatted(id).await, "$1,234.56");
        assert_eq!(eco.tokens.formatted(id).await, "1,500 Tokens");
    }
}
