// SPDX-FileCopyrightText: 2026 Phasegate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phasegate - coherence-gating middleware for generative-text applications.
//!
//! This is the binary entry point for the Phasegate server.

mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Phasegate - coherence-gating middleware for generative-text applications.
#[derive(Parser, Debug)]
#[command(name = "phasegate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Phasegate HTTP server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match phasegate_config::load_and_validate() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("phasegate: {error}");
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(error) = serve::run(config).await {
                tracing::error!("serve failed: {error}");
                std::process::exit(1);
            }
        }
        None => {
            println!("phasegate: use --help for available commands");
        }
    }
}
