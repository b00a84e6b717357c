//! Error types for the storage backend.

/// Errors that can occur in the data layer.
///
/// The ledger core never propagates these to its callers; reads degrade to
/// zero-valued records and writes are logged and dropped. They surface only
/// from startup (connect, schema) and the shutdown flush.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A query or connection operation failed.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// The backend configuration was invalid.
    #[error("configuration error: {0}")]
    Config(String),
}
