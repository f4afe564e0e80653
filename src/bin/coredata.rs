//! CLI entry point for the Coredata API client.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use coredata_api::{CoredataClient, Credentials, Entity, GetRequest};

/// Talk to a Coredata deployment from the command line.
#[derive(Parser, Debug)]
#[command(name = "coredata")]
#[command(author, version, about)]
struct Args {
    /// API host, including scheme (e.g. https://example.coredata.is)
    #[arg(long)]
    host: String,

    /// Credentials as user:pass
    #[arg(long)]
    auth: String,

    /// Make requests synchronous (default is async on the server side)
    #[arg(long)]
    sync: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a document from a JSON payload file and print its id
    Create {
        /// Collection name (e.g. projects, contacts, files)
        entity: String,
        /// Path to the JSON payload
        file: PathBuf,
    },
    /// Fetch a collection and print it as JSON
    Get {
        /// Collection name (e.g. projects, contacts, files)
        entity: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (username, secret) = args
        .auth
        .split_once(':')
        .context("--auth must be user:pass")?;
    let client = CoredataClient::new(&args.host, Credentials::new(username, secret))?;
    debug!(host = %args.host, sync = args.sync, "client ready");

    match args.command {
        Command::Create { entity, file } => {
            let entity: Entity = entity.parse()?;
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading payload from {}", file.display()))?;
            let payload: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing payload from {}", file.display()))?;
            let id = client.create(entity, &payload, args.sync).await?;
            println!("{id}");
        }
        Command::Get { entity } => {
            let entity: Entity = entity.parse()?;
            let objects = client
                .get(&GetRequest::new(entity).sync(args.sync))
                .await?;
            println!("{}", serde_json::to_string_pretty(&objects)?);
        }
    }

    Ok(())
}
