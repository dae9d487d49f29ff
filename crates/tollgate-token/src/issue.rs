//! Token issuance.

use crate::codec;
use crate::error::TokenError;
use crate::keys::KeyPair;
use crate::sign;
use uuid::Uuid;

/// Mints signed tokens. Issuance never touches the quota ledger: the
/// record for a token's identity is created by the verifier on first
/// presentation.
pub struct TokenIssuer {
    keypair: KeyPair,
}

impl TokenIssuer {
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair }
    }

    /// Issue a token for the requested quota under a fresh random
    /// identity.
    pub fn issue(&self, quota: u64) -> Result<String, TokenError> {
        self.issue_with_identity(quota, Uuid::new_v4())
    }

    /// Issue under a caller-chosen identity. Identities must never be
    /// reused across tokens; this exists so tests can pin them.
    pub fn issue_with_identity(&self, quota: u64, identity: Uuid) -> Result<String, TokenError> {
        codec::check_quota(quota)?;
        let claim = codec::claim(quota, &identity);
        let signature = sign::sign_claim(self.keypair.private_key(), claim.as_bytes())?;
        tracing::debug!(%identity, quota, "issued token");
        Ok(codec::encode(quota, &identity, &signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::sign::verify_claim;
    use crate::testutil::test_keypair;

    #[test]
    fn test_issued_token_verifies() {
        let keypair = test_keypair();
        let issuer = TokenIssuer::new(keypair.clone());

        let token = issuer.issue(1000).unwrap();
        let decoded = decode(&token).unwrap();

        assert_eq!(decoded.quota, 1000);
        assert!(
            verify_claim(keypair.public_key(), decoded.claim_bytes(), &decoded.signature).unwrap()
        );
    }

    #[test]
    fn test_zero_quota_is_issuable() {
        let issuer = TokenIssuer::new(test_keypair().clone());
        let decoded = decode(&issuer.issue(0).unwrap()).unwrap();
        assert_eq!(decoded.quota, 0);
    }

    #[test]
    fn test_identities_are_fresh_per_issue() {
        let issuer = TokenIssuer::new(test_keypair().clone());
        let a = decode(&issuer.issue(5).unwrap()).unwrap();
        let b = decode(&issuer.issue(5).unwrap()).unwrap();
        assert_ne!(a.identity, b.identity);
    }

    #[test]
    fn test_pinned_identity_is_stable() {
        let issuer = TokenIssuer::new(test_keypair().clone());
        let identity = Uuid::new_v4();

        let token = issuer.issue_with_identity(7, identity).unwrap();
        assert!(token.starts_with(&format!("7|{identity}|")));
    }

    #[test]
    fn test_oversized_quota_is_rejected() {
        let issuer = TokenIssuer::new(test_keypair().clone());
        let err = issuer.issue(u64::MAX).unwrap_err();
        assert!(matches!(err, TokenError::Malformed(_)));
    }
}
