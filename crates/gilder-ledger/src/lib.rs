//! The Gilder economy core: cached, concurrent, write-behind player ledgers.
//!
//! # Architecture
//!
//! ```text
//! Command invocations (many, concurrent)
//!     |
//!     v
//! Currency<K> / Progression        -- typed facades, floor-at-zero,
//!     |                               sufficiency checks, transfer
//!     v
//! LedgerStore                      -- cache-populate, per-identity locks,
//!     |                               write-behind dispatch, shutdown flush
//!     v
//! LedgerPool / PlayerStore         -- SQLite or MySQL (gilder-db)
//! ```
//!
//! Reads resolve against the in-memory cache and are synchronous-fast after
//! the first access; every mutation applies in memory immediately and
//! schedules one asynchronous full-record write. Storage failures never
//! reach callers: reads degrade to zero-valued records, writes are logged
//! and dropped. The only synchronous persistence point is [`shutdown`].
//!
//! [`shutdown`]: store::LedgerStore::shutdown
//!
//! # Modules
//!
//! - [`store`] -- the ledger cache and persistence orchestration (the core)
//! - [`services`] -- the generic currency facade and the [`Economy`] aggregate
//! - [`progression`] -- level-from-experience and rebirth gating rules
//! - [`config`] -- YAML configuration loading
//!
//! [`Economy`]: services::Economy

pub mod config;
pub mod progression;
pub mod services;
pub mod store;

pub use config::{ConfigError, EconomyConfig};
pub use services::{Currency, Economy};
pub use store::LedgerStore;
