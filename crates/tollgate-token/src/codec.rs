//! Wire-format encoding and decoding.
//!
//! A token on the wire is the UTF-8 string
//! `"<quota>|<identity>|<urlsafe-base64(signature)>"`: exactly two `|`
//! delimiters, three fields, no escaping (no field may contain `|`).
//! The first two fields form the signed claim. No I/O and no
//! cryptography happens here.

use crate::error::TokenError;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use uuid::Uuid;

/// Largest quota a token may carry. Bounded by the ledger's signed
/// 64-bit integer column.
pub const MAX_QUOTA: u64 = i64::MAX as u64;

/// A token decoded from its wire form.
///
/// Keeps the verbatim claim substring of the input so that signature
/// verification operates on exactly the bytes that were signed, even if
/// a field was rendered non-canonically (e.g. an uppercase UUID).
#[derive(Debug, Clone)]
pub struct DecodedToken {
    /// Quota granted at issuance. Immutable; the ledger tracks spend.
    pub quota: u64,
    /// Random per-token identifier, the ledger's primary key.
    pub identity: Uuid,
    /// Raw signature bytes over the claim.
    pub signature: Vec<u8>,
    claim: String,
}

impl DecodedToken {
    /// The signed claim, `"<quota>|<identity>"`, exactly as it appeared
    /// on the wire.
    pub fn claim_bytes(&self) -> &[u8] {
        self.claim.as_bytes()
    }
}

/// Render the claim for a token about to be signed.
pub fn claim(quota: u64, identity: &Uuid) -> String {
    format!("{quota}|{identity}")
}

/// Reject quotas the ledger cannot store.
pub fn check_quota(quota: u64) -> Result<u64, TokenError> {
    if quota > MAX_QUOTA {
        return Err(TokenError::Malformed(format!(
            "quota {quota} exceeds the maximum of {MAX_QUOTA}"
        )));
    }
    Ok(quota)
}

/// Encode a signed token into its wire form.
pub fn encode(quota: u64, identity: &Uuid, signature: &[u8]) -> String {
    format!("{quota}|{identity}|{}", URL_SAFE.encode(signature))
}

/// Decode a wire-form token into its parts.
///
/// Fails with [`TokenError::Malformed`] unless the string has exactly
/// three `|`-separated fields, the quota parses as a non-negative
/// integer in range, the identity is a valid UUID and the third field
/// is valid URL-safe base64.
pub fn decode(token: &str) -> Result<DecodedToken, TokenError> {
    let mut fields = token.split('|');
    let (Some(quota_raw), Some(identity_raw), Some(signature_raw), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(TokenError::Malformed(format!(
            "expected 3 fields, found {}",
            token.split('|').count()
        )));
    };

    let quota: u64 = quota_raw
        .parse()
        .map_err(|_| TokenError::Malformed(format!("quota {quota_raw:?} is not an integer")))?;
    check_quota(quota)?;

    let identity = Uuid::parse_str(identity_raw)
        .map_err(|_| TokenError::Malformed(format!("identity {identity_raw:?} is not a UUID")))?;

    let signature = URL_SAFE
        .decode(signature_raw)
        .map_err(|e| TokenError::Malformed(format!("signature field is not base64: {e}")))?;

    // The claim is the input up to the second delimiter, verbatim.
    let claim = token[..quota_raw.len() + 1 + identity_raw.len()].to_string();

    Ok(DecodedToken {
        quota,
        identity,
        signature,
        claim,
    })
}
