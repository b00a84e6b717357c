//! Numeric abstraction over the four plain currency counters.
//!
//! Every counter speaks the same service surface -- get, set with a zero
//! floor, add, checked remove, has, reset, transfer -- differing
//! only in which record field it touches and how values print. [`Amount`]
//! captures the arithmetic a counter needs and [`CurrencyField`] selects the
//! field, so a single generic service covers all four currencies.

use rust_decimal::Decimal;

use crate::format;
use crate::record::PlayerLedgerRecord;

/// Arithmetic surface a currency amount must support.
///
/// Implementations never overflow or underflow; they saturate. Balances are
/// clamped to zero at the service boundary, so saturation only matters at
/// the extreme ends of the numeric range.
pub trait Amount: Copy + PartialOrd + Send + Sync + 'static {
    /// The additive identity, which is also the floor every balance is
    /// clamped to.
    const ZERO: Self;

    /// Saturating addition.
    fn saturating_add(self, rhs: Self) -> Self;

    /// Saturating subtraction.
    fn saturating_sub(self, rhs: Self) -> Self;

    /// Clamp to the non-negative floor.
    fn floor_zero(self) -> Self {
        if self < Self::ZERO { Self::ZERO } else { self }
    }
}

impl Amount for Decimal {
    const ZERO: Self = Self::ZERO;

    fn saturating_add(self, rhs: Self) -> Self {
        Self::saturating_add(self, rhs)
    }

    fn saturating_sub(self, rhs: Self) -> Self {
        Self::saturating_sub(self, rhs)
    }
}

impl Amount for i64 {
    const ZERO: Self = 0;

    fn saturating_add(self, rhs: Self) -> Self {
        Self::saturating_add(self, rhs)
    }

    fn saturating_sub(self, rhs: Self) -> Self {
        Self::saturating_sub(self, rhs)
    }
}

/// Selects one currency column of a [`PlayerLedgerRecord`].
///
/// Marker types implementing this trait are the type-level names of the
/// four plain currencies; the generic currency service is instantiated once
/// per marker.
pub trait CurrencyField: Send + Sync + 'static {
    /// Numeric type of this currency.
    type Amount: Amount;

    /// Human-readable currency name used in logs.
    const NAME: &'static str;

    /// Read this currency's value from a record.
    fn get(record: &PlayerLedgerRecord) -> Self::Amount;

    /// Write this currency's value into a record.
    fn set(record: &mut PlayerLedgerRecord, value: Self::Amount);

    /// Render a value the way user-facing surfaces display this currency.
    fn format(value: Self::Amount) -> String;
}

/// The decimal cash balance, displayed as `$1,234.56`.
pub struct BalanceField;

impl CurrencyField for BalanceField {
    type Amount = Decimal;

    const NAME: &'static str = "balance";

    fn get(record: &PlayerLedgerRecord) -> Decimal {
        record.balance
    }

    fn set(record: &mut PlayerLedgerRecord, value: Decimal) {
        record.balance = value;
    }

    fn format(value: Decimal) -> String {
        format!("${}", format::format_grouped_decimal(value))
    }
}

/// The token counter, displayed as `1,234 Tokens`.
pub struct TokenField;

impl CurrencyField for TokenField {
    type Amount = i64;

    const NAME: &'static str = "tokens";

    fn get(record: &PlayerLedgerRecord) -> i64 {
        record.tokens
    }

    fn set(record: &mut PlayerLedgerRecord, value: i64) {
        record.tokens = value;
    }

    fn format(value: i64) -> String {
        format!("{} Tokens", format::format_grouped_int(value))
    }
}

/// The shard counter, displayed as `1,234 Shards`.
pub struct ShardField;

impl CurrencyField for ShardField {
    type Amount = i64;

    const NAME: &'static str = "shards";

    fn get(record: &PlayerLedgerRecord) -> i64 {
        record.shards
    }

    fn set(record: &mut PlayerLedgerRecord, value: i64) {
        record.shards = value;
    }

    fn format(value: i64) -> String {
        format!("{} Shards", format::format_grouped_int(value))
    }
}

/// The credit counter, displayed as `1,234 Credits`.
pub struct CreditField;

impl CurrencyField for CreditField {
    type Amount = i64;

    const NAME: &'static str = "credits";

    fn get(record: &PlayerLedgerRecord) -> i64 {
        record.credits
    }

    fn set(record: &mut PlayerLedgerRecord, value: i64) {
        record.credits = value;
    }

    fn format(value: i64) -> String {
        format!("{} Credits", format::format_grouped_int(value))
    }
}
