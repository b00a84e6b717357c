//! Adapters exposing the Gilder economy to external consumers.
//!
//! Everything here is a thin translation shim over [`gilder_ledger`]; no
//! adapter carries state or invariants of its own.
//!
//! - [`placeholders`] -- read-only formatted strings for text templating
//! - [`provider`] -- the narrow read/write balance interface third-party
//!   plugins consume
//! - [`session`] -- lifecycle notifications (first interaction, shutdown)

pub mod placeholders;
pub mod provider;
pub mod session;

pub use placeholders::Placeholders;
pub use provider::{BalanceBridge, EconomyProvider};
pub use session::SessionHooks;
