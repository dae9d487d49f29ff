//! CLI command implementations.

pub mod issue;
pub mod keys;
pub mod verify;

use anyhow::Context;

/// Resolve the private-key passphrase from the named environment
/// variable. Passing the passphrase itself on the command line would
/// leak it into process listings.
pub fn passphrase_from_env(var: Option<&str>) -> anyhow::Result<Option<String>> {
    var.map(|var| {
        std::env::var(var).with_context(|| format!("passphrase variable {var} is not set"))
    })
    .transpose()
}
