//! Sanction screening lookup against the CipherOwl API.
//!
//! Reads `CLIENT_ID`/`CLIENT_SECRET` from the environment (optionally via a
//! local `.env` file), obtains a bearer token (reusing the cached one when
//! still valid) and pretty-prints the screening result.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cipherowl_integration::{
    cipherowl_config, CacheStrategy, CipherOwlClient, Credentials, Error, SanctionQuery,
};

#[derive(Parser, Debug)]
#[command(name = "sanction-check", about = "Screen an address against the CipherOwl sanction lists")]
struct Args {
    /// Project the lookup is billed against.
    #[arg(long, default_value = "partner")]
    project: String,

    /// Chain identifier.
    #[arg(long, default_value = "bitcoin_mainnet")]
    chain: String,

    /// Address to screen.
    #[arg(long, default_value = "12udabs2TkX7NXCSj6KpqXfakjE52ZPLhz")]
    address: String,

    /// Keep the token cache in process memory instead of on disk.
    #[arg(long)]
    memory_cache: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!(code = err.error_code(), error = %err, "sanction check failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    if let Err(err) = dotenvy::dotenv() {
        tracing::debug!(error = %err, "no .env file loaded");
    }

    let args = Args::parse();

    // Credentials and cache location are resolved before any network call.
    let credentials = Credentials::from_env()?;
    let config = cipherowl_config()
        .credentials(credentials)
        .cache(if args.memory_cache {
            CacheStrategy::InMemory
        } else {
            CacheStrategy::Durable
        })
        .build()?;

    let client = CipherOwlClient::new(config)?;
    let report = client
        .check_sanction(&SanctionQuery {
            project: args.project,
            chain: args.chain,
            address: args.address,
        })
        .await?;

    println!("{report:#}");
    Ok(())
}
