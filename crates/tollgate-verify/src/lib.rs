//! # tollgate-verify
//!
//! Verifies inbound tokens and authorizes spends against the quota
//! ledger.
//!
//! Construction runs the whole validation pipeline eagerly (extract,
//! decode, authenticate, materialize the ledger record) and fails
//! fast; a [`TokenVerifier`] in hand is proof the token was genuine.
//! Spending is the only repeatable operation afterwards, one call per
//! unit of downstream work.
//!
//! The ledger handle and the public key are explicit constructor
//! arguments. Verification never sees the private key: issuance and
//! verification are separable roles and only the public half crosses
//! that boundary.

use tollgate_ledger::QuotaLedger;
use tollgate_token::{RsaPublicKey, TokenError, carrier, codec, sign};
use uuid::Uuid;

pub mod error;

pub use error::VerifyError;
// Callers naming a carrier mode shouldn't need a direct tollgate-token dep.
pub use tollgate_token::TokenSource;

/// A validated token bound to the ledger that tracks its budget.
#[derive(Debug)]
pub struct TokenVerifier {
    identity: Uuid,
    quota: u64,
    ledger: QuotaLedger,
}

impl TokenVerifier {
    /// Validate `input` and materialize the quota record on first
    /// sight of the token's identity.
    ///
    /// Fails with the stage that rejected the token: `MissingToken`
    /// (extraction), `Malformed` (decoding), `InvalidSignature`
    /// (authentication) or a ledger error (materialization).
    pub async fn new(
        input: &str,
        source: TokenSource,
        public_key: &RsaPublicKey,
        ledger: &QuotaLedger,
    ) -> Result<Self, VerifyError> {
        let token = carrier::extract_token(input, source)?;
        let decoded = codec::decode(&token)?;

        if !sign::verify_claim(public_key, decoded.claim_bytes(), &decoded.signature)? {
            tracing::debug!(identity = %decoded.identity, "rejected token with bad signature");
            return Err(TokenError::InvalidSignature.into());
        }

        let created = ledger
            .initialize_if_absent(decoded.identity, decoded.quota)
            .await?;
        tracing::debug!(
            identity = %decoded.identity,
            quota = decoded.quota,
            first_sight = created,
            "verified token"
        );

        Ok(Self {
            identity: decoded.identity,
            quota: decoded.quota,
            ledger: ledger.clone(),
        })
    }

    /// The token's identity, the ledger's primary key.
    pub fn identity(&self) -> Uuid {
        self.identity
    }

    /// The quota granted at issuance. Not the current balance.
    pub fn quota(&self) -> u64 {
        self.quota
    }

    /// Current balance for this token.
    pub async fn remaining(&self) -> Result<u64, VerifyError> {
        // The record was materialized at construction and records are
        // never deleted, so absence cannot happen; read it as empty
        // rather than inventing an error.
        Ok(self.ledger.remaining(self.identity).await?.unwrap_or(0))
    }

    /// Atomically spend `amount` against this token's balance.
    ///
    /// Returns the balance left after the spend, or
    /// [`VerifyError::QuotaExceeded`] on denial. Denial is final for
    /// this token: the balance never grows back.
    pub async fn try_spend(&self, amount: u64) -> Result<u64, VerifyError> {
        match self.ledger.try_spend(self.identity, amount).await? {
            Some(balance) => Ok(balance),
            None => Err(VerifyError::QuotaExceeded {
                identity: self.identity,
            }),
        }
    }
}
