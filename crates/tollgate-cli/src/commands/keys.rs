//! Key management commands.
//!
//! `tollgate keys generate` - Create the key pair if absent.

use std::path::PathBuf;
use tollgate_token::KeyManager;

/// Ensure the key pair exists, generating and persisting it on first
/// run. Idempotent: an existing pair is loaded, never overwritten.
pub fn generate(
    private_key: PathBuf,
    public_key: PathBuf,
    passphrase: Option<String>,
) -> anyhow::Result<()> {
    let mut manager = KeyManager::new(&private_key, &public_key);
    if let Some(passphrase) = passphrase {
        manager = manager.with_passphrase(passphrase);
    }
    manager.ensure()?;

    println!("✔ Key pair ready:");
    println!("  Private key: {}", private_key.display());
    println!("  Public key:  {}", public_key.display());
    println!();
    println!("⚠️  Keep the private key on the issuing host. Verifiers only need the public key.");

    Ok(())
}
