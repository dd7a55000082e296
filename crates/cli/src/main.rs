//! `FixedScope` CLI - operator tools for the Shopify proxy.
//!
//! # Usage
//!
//! ```bash
//! # List clients with credentials in the environment
//! fs-cli clients
//!
//! # Check that a client's credentials can be exchanged for a token
//! fs-cli token acme
//!
//! # Print a client's daily summary (defaults to today)
//! fs-cli daily acme --date 2026-03-14
//! ```
//!
//! # Commands
//!
//! - `clients` - List configured client identifiers
//! - `token` - Perform a token exchange and report its expiry
//! - `daily` - Print a daily sales summary as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fs-cli")]
#[command(author, version, about = "FixedScope Shopify proxy tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured client identifiers
    Clients,
    /// Exchange a client's credentials for an access token
    Token {
        /// Client identifier (e.g., acme)
        client: String,
    },
    /// Print a client's daily sales summary
    Daily {
        /// Client identifier (e.g., acme)
        client: String,

        /// Day to summarize (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fixedscope_proxy=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let output = match cli.command {
        Commands::Clients => commands::clients::list(),
        Commands::Token { client } => commands::token::check(&client).await?,
        Commands::Daily { client, date } => commands::daily::print(&client, date).await?,
    };
    println!("{output}");
    Ok(())
}
