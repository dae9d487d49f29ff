//! Error types for the quota ledger.

use thiserror::Error;

/// Errors that can occur against the quota store.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The store is unreachable or an operation timed out. Transient;
    /// the caller may retry the whole verification.
    #[error("quota store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    /// A quota or spend amount does not fit the ledger's integer column.
    #[error("amount {0} exceeds the ledger's integer range")]
    AmountOutOfRange(u64),
}
