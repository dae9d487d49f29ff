//! # tollgate-token
//!
//! Token format, signing and key storage for Tollgate.
//!
//! This crate provides functionality for:
//! - Managing the RSA key pair (generate on first use, load thereafter)
//! - Encoding and decoding the `quota|identity|signature` wire format
//! - Signing and verifying token claims with RSA-PSS/SHA-256
//! - Extracting tokens from carrier URLs
//! - Issuing new tokens
//!
//! ## Token model
//!
//! A token is a bearer credential carrying its own authorization: the
//! quota granted at issuance, a random 128-bit identity, and an RSA-PSS
//! signature over `quota|identity`. The token never changes after
//! issuance; consumption is tracked against the identity by the ledger
//! (see `tollgate-ledger`), not by the token itself.
//!
//! Issuance (private key) and verification (public key) are separable
//! roles. Nothing in this crate touches the ledger.

pub mod carrier;
pub mod codec;
pub mod error;
pub mod issue;
pub mod keys;
pub mod sign;
#[cfg(test)]
mod testutil;

pub use carrier::{TokenSource, carrier_url, extract_token};
pub use codec::DecodedToken;
pub use error::{KeyStorageError, TokenError};
pub use issue::TokenIssuer;
pub use keys::{KeyManager, KeyPair, load_public_key};
// Re-export the key types callers hold across the issuer/verifier boundary
pub use rsa::{RsaPrivateKey, RsaPublicKey};
