//! On-disk configuration.
//!
//! `tollgate.yaml` holds the fixed, well-known paths shared by the two
//! roles plus the base URL tokens are issued under. No secrets live
//! here: the private-key passphrase, if any, arrives via an
//! environment variable named on the command line.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "tollgate.yaml";
pub const DEFAULT_PRIVATE_KEY: &str = "private_key.pem";
pub const DEFAULT_PUBLIC_KEY: &str = "public_key.pem";
pub const DEFAULT_LEDGER: &str = "quota.db";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TollgateConfig {
    /// Private key PEM (issuer role only).
    #[serde(default)]
    pub private_key: Option<PathBuf>,

    /// Public key PEM (both roles).
    #[serde(default)]
    pub public_key: Option<PathBuf>,

    /// SQLite quota ledger (verifier role only).
    #[serde(default)]
    pub ledger: Option<PathBuf>,

    /// Base URL carrier links are issued under.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl TollgateConfig {
    /// Load configuration. An explicitly passed path must exist; the
    /// default `tollgate.yaml` is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    // Flag (or env, via clap) wins over the config file, which wins
    // over the built-in default.

    pub fn private_key_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.private_key.clone())
            .unwrap_or_else(|| DEFAULT_PRIVATE_KEY.into())
    }

    pub fn public_key_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.public_key.clone())
            .unwrap_or_else(|| DEFAULT_PUBLIC_KEY.into())
    }

    pub fn ledger_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.ledger.clone())
            .unwrap_or_else(|| DEFAULT_LEDGER.into())
    }

    pub fn base_url(&self, flag: Option<String>) -> Option<String> {
        flag.or_else(|| self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() {
        let cfg: TollgateConfig = serde_yaml::from_str(
            r#"
private_key: keys/private_key.pem
public_key: keys/public_key.pem
ledger: state/quota.db
base_url: https://gate.example.org/
"#,
        )
        .unwrap();

        assert_eq!(cfg.private_key.unwrap(), PathBuf::from("keys/private_key.pem"));
        assert_eq!(cfg.base_url.unwrap(), "https://gate.example.org/");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<TollgateConfig, _> = serde_yaml::from_str("privat_key: oops.pem");
        assert!(result.is_err());
    }

    #[test]
    fn test_flag_beats_config_beats_default() {
        let cfg = TollgateConfig {
            ledger: Some("from-config.db".into()),
            ..Default::default()
        };

        assert_eq!(
            cfg.ledger_path(Some("from-flag.db".into())),
            PathBuf::from("from-flag.db")
        );
        assert_eq!(cfg.ledger_path(None), PathBuf::from("from-config.db"));
        assert_eq!(
            TollgateConfig::default().ledger_path(None),
            PathBuf::from(DEFAULT_LEDGER)
        );
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(TollgateConfig::load(Some(&missing)).is_err());
    }
}
