//! Storage backend for the Gilder economy ledger.
//!
//! One relational table, `player_ledger`, holds exactly one row per player
//! identity with every ledger field. Two backend flavors sit behind a single
//! pool interface: embedded SQLite (the default, a file next to the server)
//! and networked MySQL. Both speak `?`-placeholder SQL, so every query in
//! this crate runs unchanged on either flavor via [`sqlx`]'s `Any` driver.
//!
//! ```text
//! LedgerStore (gilder-ledger)
//!     |
//!     +-- PlayerStore ---- SELECT / INSERT / UPDATE --> player_ledger
//!     |
//!     +-- LedgerPool ----- connect / schema / close --> SQLite or MySQL
//! ```
//!
//! Uses runtime query construction (not compile-time checked) so no live
//! database is needed at build time. All queries are parameterized.

pub mod config;
pub mod error;
pub mod player_store;
pub mod pool;

pub use config::{BackendKind, DatabaseConfig};
pub use error::DbError;
pub use player_store::PlayerStore;
pub use pool::LedgerPool;
