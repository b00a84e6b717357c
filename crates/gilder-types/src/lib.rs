//! Shared types for the Gilder economy ledger.
//!
//! This crate holds the vocabulary the rest of the workspace speaks:
//!
//! - [`PlayerId`] -- the stable identity a ledger row is keyed by
//! - [`PlayerLedgerRecord`] -- the seven-field cached balance snapshot
//! - [`Amount`] and [`CurrencyField`] -- the numeric abstraction that lets
//!   one generic currency service cover every plain counter
//! - [`format`] -- human-facing number formatting and suffixed parsing
//!
//! No I/O happens here; everything is pure data and pure functions.

pub mod fields;
pub mod format;
pub mod ids;
pub mod record;

pub use fields::{Amount, BalanceField, CreditField, CurrencyField, ShardField, TokenField};
pub use format::ParseAmountError;
pub use ids::PlayerId;
pub use record::PlayerLedgerRecord;
