//! Chitieu CLI - Expense-tracking chat bot
//!
//! Usage:
//!   chitieu init                          Initialize database
//!   chitieu serve --port 5000             Start the webhook server
//!   chitieu send --user u1 chi 12000 cafe Run a message through the bot locally

mod cli;
mod commands;


use anyhow::Result;
use chitieu_core::config::BotConfig;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let mut config = BotConfig::from_env();
    if let Some(db) = cli.db {
        config.database_url = db;
    }

    match cli.command {
        Commands::Init => commands::cmd_init(&config),
        Commands::Serve { host, port } => commands::cmd_serve(&config, &host, port).await,
        Commands::Send { user, date, text } => commands::cmd_send(&config, &user, date, &text),
    }
}
