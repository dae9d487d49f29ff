//! Verification error taxonomy and its boundary mapping.

use thiserror::Error;
use tollgate_ledger::LedgerError;
use tollgate_token::TokenError;
use uuid::Uuid;

/// Errors from verifying a token or authorizing a spend.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Extraction, decoding or signature verification failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The spend was denied: the balance does not cover the amount.
    #[error("quota exceeded for token {identity}")]
    QuotaExceeded { identity: Uuid },

    /// The quota store failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl VerifyError {
    /// Whether this is an authentication-stage failure (the
    /// 401-equivalent class: missing, malformed or forged token).
    /// Quota denial is authorization, not authentication.
    pub fn is_authentication_failure(&self) -> bool {
        match self {
            // Key-storage failures are fatal startup conditions, not a
            // statement about the presented token.
            Self::Token(TokenError::KeyStorage(_)) => false,
            Self::Token(_) => true,
            _ => false,
        }
    }

    /// Whether the caller may retry the whole verification.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ledger(LedgerError::Unavailable(_)))
    }

    /// The message safe to show an untrusted client. Every
    /// authentication-stage failure collapses to the same opaque
    /// answer so the response does not reveal which stage rejected
    /// the token; the internal kind goes to logs only.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Token(TokenError::KeyStorage(_)) | Self::Ledger(_) => {
                "service temporarily unavailable"
            }
            Self::Token(_) => "invalid token",
            Self::QuotaExceeded { .. } => "quota exceeded",
        }
    }
}
