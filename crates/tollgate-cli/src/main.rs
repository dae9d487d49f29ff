use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tollgate_token::TokenSource;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{issue::IssueArgs, verify::VerifyArgs};
use config::TollgateConfig;

#[derive(Parser, Debug)]
#[command(name = "tollgate", version, about = "Signed quota tokens for an expensive downstream service")]
struct Cli {
    /// Config file (default: ./tollgate.yaml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Key pair management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Issue signed quota tokens (creates the key pair on first run)
    Issue {
        /// Quota granted to each issued token
        #[arg(long)]
        quota: u64,

        /// Number of tokens to issue
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Print bare tokens instead of carrier URLs
        #[arg(long, default_value_t = false)]
        bare: bool,

        /// Emit one JSON object per token
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Base URL for carrier links
        #[arg(long, env = "TOLLGATE_BASE_URL")]
        base_url: Option<String>,

        /// Private key PEM path
        #[arg(long, env = "TOLLGATE_PRIVATE_KEY")]
        private_key: Option<PathBuf>,

        /// Public key PEM path
        #[arg(long, env = "TOLLGATE_PUBLIC_KEY")]
        public_key: Option<PathBuf>,

        /// Environment variable holding the private key passphrase
        #[arg(long)]
        passphrase_env: Option<String>,
    },

    /// Verify tokens/URLs and optionally spend quota
    Verify {
        /// Tokens or carrier URLs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Spend this amount against each verified token
        /// (without it, only the balance is reported)
        #[arg(long)]
        spend: Option<u64>,

        /// How the inputs carry their token
        #[arg(long, value_enum, default_value_t = SourceArg::Auto)]
        source: SourceArg,

        /// Public key PEM path
        #[arg(long, env = "TOLLGATE_PUBLIC_KEY")]
        public_key: Option<PathBuf>,

        /// Quota ledger database path
        #[arg(long, env = "TOLLGATE_LEDGER")]
        ledger: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate the key pair if absent; load it otherwise
    Generate {
        /// Private key PEM path
        #[arg(long, env = "TOLLGATE_PRIVATE_KEY")]
        private_key: Option<PathBuf>,

        /// Public key PEM path
        #[arg(long, env = "TOLLGATE_PUBLIC_KEY")]
        public_key: Option<PathBuf>,

        /// Environment variable holding the private key passphrase
        #[arg(long)]
        passphrase_env: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceArg {
    /// Leading digit means bare token, otherwise a carrier URL
    Auto,
    /// Inputs are bare tokens
    Bare,
    /// Inputs are carrier URLs
    Url,
}

impl From<SourceArg> for TokenSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Auto => TokenSource::Auto,
            SourceArg::Bare => TokenSource::Bare,
            SourceArg::Url => TokenSource::CarrierUrl,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries tokens and results.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = TollgateConfig::load(cli.config.as_deref())?;

    match cli.cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate {
                private_key,
                public_key,
                passphrase_env,
            } => commands::keys::generate(
                cfg.private_key_path(private_key),
                cfg.public_key_path(public_key),
                commands::passphrase_from_env(passphrase_env.as_deref())?,
            )?,
        },

        Command::Issue {
            quota,
            count,
            bare,
            json,
            base_url,
            private_key,
            public_key,
            passphrase_env,
        } => commands::issue::run(IssueArgs {
            quota,
            count,
            bare,
            json,
            private_key: cfg.private_key_path(private_key),
            public_key: cfg.public_key_path(public_key),
            passphrase: commands::passphrase_from_env(passphrase_env.as_deref())?,
            base_url: cfg.base_url(base_url),
        })?,

        Command::Verify {
            inputs,
            spend,
            source,
            public_key,
            ledger,
        } => {
            let all_ok = commands::verify::run(VerifyArgs {
                inputs,
                spend,
                source: source.into(),
                public_key: cfg.public_key_path(public_key),
                ledger: cfg.ledger_path(ledger),
            })
            .await?;

            // Batch processing never aborts early; the exit code just
            // reports whether anything failed.
            if !all_ok {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
