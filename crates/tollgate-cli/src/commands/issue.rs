//! Token issuance command.
//!
//! `tollgate issue` - Mint signed quota tokens, creating the key pair
//! on first run. Tokens go to stdout, one per line; everything else
//! goes to stderr so output can be piped.

use anyhow::Context;
use std::path::PathBuf;
use tollgate_token::{KeyManager, TokenIssuer, carrier};
use url::Url;

pub struct IssueArgs {
    pub quota: u64,
    pub count: u32,
    pub bare: bool,
    pub json: bool,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    pub passphrase: Option<String>,
    pub base_url: Option<String>,
}

pub fn run(args: IssueArgs) -> anyhow::Result<()> {
    let base = if args.bare {
        None
    } else {
        let raw = args.base_url.context(
            "no base URL configured; pass --base-url, set TOLLGATE_BASE_URL, \
             add base_url to tollgate.yaml, or use --bare",
        )?;
        Some(Url::parse(&raw).with_context(|| format!("invalid base URL {raw:?}"))?)
    };

    let mut manager = KeyManager::new(&args.private_key, &args.public_key);
    if let Some(passphrase) = args.passphrase {
        manager = manager.with_passphrase(passphrase);
    }
    let keypair = manager.ensure()?;
    let issuer = TokenIssuer::new(keypair);

    for _ in 0..args.count {
        let token = issuer.issue(args.quota)?;
        match &base {
            Some(base) => {
                let url = carrier::carrier_url(base, &token);
                if args.json {
                    println!(
                        "{}",
                        serde_json::json!({ "quota": args.quota, "url": url.as_str() })
                    );
                } else {
                    println!("{url}");
                }
            }
            None => {
                if args.json {
                    println!(
                        "{}",
                        serde_json::json!({ "quota": args.quota, "token": token })
                    );
                } else {
                    println!("{token}");
                }
            }
        }
    }

    Ok(())
}
