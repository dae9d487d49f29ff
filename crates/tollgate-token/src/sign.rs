//! Signing and verifying token claims.
//!
//! RSA-PSS over SHA-256 with the maximal salt length the modulus
//! admits. The claim bytes are always `"<quota>|<identity>"` as UTF-8,
//! reproduced identically at sign and verify time; any change to field
//! order, delimiter or encoding silently invalidates every previously
//! issued token.

use crate::error::TokenError;
use rsa::traits::PublicKeyParts;
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

// emLen - hLen - 2, the PSS maximum for a SHA-256 digest.
fn max_salt_len(modulus_size: usize) -> usize {
    modulus_size - Sha256::output_size() - 2
}

/// Sign a claim with the private key. The signature is probabilistic:
/// signing the same claim twice yields different bytes.
pub fn sign_claim(private_key: &RsaPrivateKey, claim: &[u8]) -> Result<Vec<u8>, TokenError> {
    let digest = Sha256::digest(claim);
    let padding = Pss::new_with_salt::<Sha256>(max_salt_len(private_key.size()));
    private_key
        .sign_with_rng(&mut rand::thread_rng(), padding, &digest)
        .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify a signature against a claim.
///
/// Any cryptographic mismatch (tampered claim, tampered signature,
/// wrong key) returns `Ok(false)`. A signature whose length does not
/// match the key modulus is structurally invalid and fails with
/// [`TokenError::SignatureFormat`].
pub fn verify_claim(
    public_key: &RsaPublicKey,
    claim: &[u8],
    signature: &[u8],
) -> Result<bool, TokenError> {
    if signature.len() != public_key.size() {
        return Err(TokenError::SignatureFormat(format!(
            "signature is {} bytes, key modulus is {} bytes",
            signature.len(),
            public_key.size()
        )));
    }

    let digest = Sha256::digest(claim);
    let padding = Pss::new_with_salt::<Sha256>(max_salt_len(public_key.size()));
    Ok(public_key.verify(padding, &digest, signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_keypair;

    #[test]
    fn test_sign_verify_round_trip() {
        let keypair = test_keypair();
        let claim = b"5|936da01f-9abd-4d9d-80c7-02af85c822a8";

        let signature = sign_claim(keypair.private_key(), claim).unwrap();
        assert!(verify_claim(keypair.public_key(), claim, &signature).unwrap());
    }

    #[test]
    fn test_signatures_are_probabilistic() {
        let keypair = test_keypair();
        let claim = b"1|936da01f-9abd-4d9d-80c7-02af85c822a8";

        let first = sign_claim(keypair.private_key(), claim).unwrap();
        let second = sign_claim(keypair.private_key(), claim).unwrap();
        assert_ne!(first, second);
        assert!(verify_claim(keypair.public_key(), claim, &first).unwrap());
        assert!(verify_claim(keypair.public_key(), claim, &second).unwrap());
    }

    #[test]
    fn test_tampered_claim_fails() {
        let keypair = test_keypair();
        let signature =
            sign_claim(keypair.private_key(), b"5|936da01f-9abd-4d9d-80c7-02af85c822a8").unwrap();

        let verified = verify_claim(
            keypair.public_key(),
            b"6|936da01f-9abd-4d9d-80c7-02af85c822a8",
            &signature,
        )
        .unwrap();
        assert!(!verified);
    }

    #[test]
    fn test_tampered_signature_fails() {
        let keypair = test_keypair();
        let claim = b"5|936da01f-9abd-4d9d-80c7-02af85c822a8";

        let mut signature = sign_claim(keypair.private_key(), claim).unwrap();
        signature[0] ^= 0x01;
        assert!(!verify_claim(keypair.public_key(), claim, &signature).unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let keypair = test_keypair();
        let other = crate::keys::KeyPair::generate(2048).unwrap();
        let claim = b"5|936da01f-9abd-4d9d-80c7-02af85c822a8";

        let signature = sign_claim(keypair.private_key(), claim).unwrap();
        assert!(!verify_claim(other.public_key(), claim, &signature).unwrap());
    }

    #[test]
    fn test_truncated_signature_is_structural_error() {
        let keypair = test_keypair();
        let claim = b"5|936da01f-9abd-4d9d-80c7-02af85c822a8";

        let signature = sign_claim(keypair.private_key(), claim).unwrap();
        let err = verify_claim(keypair.public_key(), claim, &signature[..16]).unwrap_err();
        assert!(matches!(err, TokenError::SignatureFormat(_)));
    }
}
