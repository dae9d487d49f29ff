//! # tollgate-ledger
//!
//! Durable per-token quota ledger backed by SQLite.
//!
//! One table, keyed by token identity, holding the remaining balance.
//! A record is seeded on the first successful verification of a token
//! and only ever decremented afterwards; there is no replenishment and
//! no deletion path. Both mutations are single conditional SQL
//! statements, so concurrent requests bearing the same identity can
//! neither double-seed a record nor over-spend it: the
//! check-and-decrement happens inside the database, never in
//! application code.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

pub mod error;

pub use error::LedgerError;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS quotas ( \
     identity TEXT PRIMARY KEY, \
     remaining INTEGER NOT NULL CHECK (remaining >= 0) \
     )";

// Bounded waits so a wedged store surfaces as Unavailable instead of
// hanging a request.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the quota store. Cheap to clone; all clones share one
/// connection pool. Constructed once and passed to every verifier.
#[derive(Debug, Clone)]
pub struct QuotaLedger {
    pool: SqlitePool,
}

impl QuotaLedger {
    /// Open (creating if missing) the ledger database at `path` and
    /// apply the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA_SQL).execute(&pool).await?;
        tracing::debug!(path = %path.as_ref().display(), "opened quota ledger");
        Ok(Self { pool })
    }

    /// Seed a record with `remaining = quota` unless one already exists
    /// for this identity. Returns whether a record was created.
    ///
    /// Re-presenting a token never re-seeds its record: a conflicting
    /// insert is a no-op, whatever quota it carries.
    pub async fn initialize_if_absent(
        &self,
        identity: Uuid,
        quota: u64,
    ) -> Result<bool, LedgerError> {
        let quota = db_amount(quota)?;
        let result = sqlx::query(
            "INSERT INTO quotas (identity, remaining) VALUES (?1, ?2) \
             ON CONFLICT (identity) DO NOTHING",
        )
        .bind(identity.to_string())
        .bind(quota)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() == 1;
        if created {
            tracing::debug!(%identity, quota, "seeded quota record");
        }
        Ok(created)
    }

    /// Current balance, or `None` if no record exists yet.
    pub async fn remaining(&self, identity: Uuid) -> Result<Option<u64>, LedgerError> {
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT remaining FROM quotas WHERE identity = ?1")
                .bind(identity.to_string())
                .fetch_optional(&self.pool)
                .await?;
        Ok(balance.map(|b| b as u64))
    }

    /// Atomically spend `amount` if the balance covers it.
    ///
    /// Returns the balance after the spend on a grant, `None` on a deny
    /// (insufficient balance, or no record). The predicate and the
    /// decrement are one statement against the store.
    pub async fn try_spend(&self, identity: Uuid, amount: u64) -> Result<Option<u64>, LedgerError> {
        let amount = db_amount(amount)?;
        let balance: Option<i64> = sqlx::query_scalar(
            "UPDATE quotas SET remaining = remaining - ?2 \
             WHERE identity = ?1 AND remaining >= ?2 \
             RETURNING remaining",
        )
        .bind(identity.to_string())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        match balance {
            Some(b) => {
                tracing::debug!(%identity, amount, remaining = b, "spend granted");
                Ok(Some(b as u64))
            }
            None => {
                tracing::debug!(%identity, amount, "spend denied");
                Ok(None)
            }
        }
    }
}

fn db_amount(amount: u64) -> Result<i64, LedgerError> {
    i64::try_from(amount).map_err(|_| LedgerError::AmountOutOfRange(amount))
}
