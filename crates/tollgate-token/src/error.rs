//! Error types for the token crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting, decoding, signing or verifying
/// tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The carrier contained no extractable token.
    #[error("carrier is malformed or does not contain a token")]
    MissingToken,

    /// The token string does not match the wire format.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The signature bytes are structurally invalid for the key in use.
    #[error("structurally invalid signature: {0}")]
    SignatureFormat(String),

    /// The signature does not verify against the claim.
    #[error("signature verification failed")]
    InvalidSignature,

    /// Failed to produce a signature.
    #[error("failed to sign claim: {0}")]
    Signing(String),

    /// Key artifacts are missing, inconsistent or corrupt.
    #[error(transparent)]
    KeyStorage(#[from] KeyStorageError),
}

/// Errors raised by [`crate::keys::KeyManager`] when loading or creating
/// the persisted key pair.
#[derive(Debug, Error)]
pub enum KeyStorageError {
    /// Key generation failed.
    #[error("failed to generate key pair: {0}")]
    Generation(String),

    /// Exactly one of the two key artifacts exists.
    #[error("inconsistent key store: {present} exists but {missing} is missing")]
    Inconsistent { present: PathBuf, missing: PathBuf },

    /// A key artifact could not be read.
    #[error("failed to read key {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A key artifact could not be parsed.
    #[error("failed to parse key {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A key artifact could not be written.
    #[error("failed to write key {path}: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored public key does not belong to the stored private key.
    #[error("public key {0} does not match the private key")]
    Mismatched(PathBuf),
}
