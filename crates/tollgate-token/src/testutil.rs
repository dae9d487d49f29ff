//! Shared test fixtures.

use crate::keys::KeyPair;
use std::sync::OnceLock;

/// A process-wide key pair so each test does not pay for 2048-bit RSA
/// generation.
pub(crate) fn test_keypair() -> &'static KeyPair {
    static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();
    KEYPAIR.get_or_init(|| KeyPair::generate(2048).expect("test key generation"))
}
