//! The narrow economy interface third-party plugins consume.
//!
//! Shops, job rewards, and auction plugins do not want the full ledger
//! surface; they want deposit, withdraw, and a balance check against the
//! cash balance. [`EconomyProvider`] is that contract, and
//! [`BalanceBridge`] implements it over the ledger's balance service.

use rust_decimal::Decimal;

use gilder_ledger::{Currency, Economy};
use gilder_types::{BalanceField, CurrencyField, PlayerId};

/// The read/write cash-balance contract exposed to external plugins.
pub trait EconomyProvider {
    /// Current cash balance.
    fn balance(&self, id: PlayerId) -> impl Future<Output = Decimal> + Send;

    /// Whether the balance covers `amount`.
    fn has(&self, id: PlayerId, amount: Decimal) -> impl Future<Output = bool> + Send;

    /// Add `amount` to the balance. Negative deposits are rejected.
    fn deposit(&self, id: PlayerId, amount: Decimal) -> impl Future<Output = bool> + Send;

    /// Remove `amount` if the balance covers it; reports whether the
    /// withdrawal happened. Negative withdrawals are rejected.
    fn withdraw(&self, id: PlayerId, amount: Decimal) -> impl Future<Output = bool> + Send;

    /// Move `amount` between players, all-or-nothing.
    fn transfer(
        &self,
        from: PlayerId,
        to: PlayerId,
        amount: Decimal,
    ) -> impl Future<Output = bool> + Send;

    /// Render an amount the way this economy displays cash.
    fn format(&self, amount: Decimal) -> String;
}

/// [`EconomyProvider`] over the ledger's cash balance service.
#[derive(Clone)]
pub struct BalanceBridge {
    balance: Currency<BalanceField>,
}

impl BalanceBridge {
    /// Bridge the given economy's balance service.
    pub fn new(economy: &Economy) -> Self {
        Self {
            balance: economy.balance.clone(),
        }
    }
}

impl EconomyProvider for BalanceBridge {
    async fn balance(&self, id: PlayerId) -> Decimal {
        self.balance.get(id).await
    }

    async fn has(&self, id: PlayerId, amount: Decimal) -> bool {
        self.balance.has(id, amount).await
    }

    async fn deposit(&self, id: PlayerId, amount: Decimal) -> bool {
        if amount < Decimal::ZERO {
            return false;
        }
        self.balance.add(id, amount).await;
        true
    }

    async fn withdraw(&self, id: PlayerId, amount: Decimal) -> bool {
        if amount < Decimal::ZERO {
            return false;
        }
        self.balance.remove(id, amount).await
    }

    async fn transfer(&self, from: PlayerId, to: PlayerId, amount: Decimal) -> bool {
        if amount < Decimal::ZERO {
            return false;
        }
        self.balance.transfer(from, to, amount).await
    }

    fn format(&self, amount: Decimal) -> String {
        BalanceField::format(amount)
    }
}
