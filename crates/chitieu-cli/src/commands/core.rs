//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the configured database
//! - `cmd_init` - Initialize the database

use anyhow::{Context, Result};
use chitieu_core::config::BotConfig;
use chitieu_core::db::Database;

/// Open the database named by the configuration
pub fn open_db(config: &BotConfig) -> Result<Database> {
    Database::from_url(&config.database_url)
        .with_context(|| format!("Failed to open database '{}'", config.database_url))
}

pub fn cmd_init(config: &BotConfig) -> Result<()> {
    println!("🔧 Initializing database at {}...", config.database_url);

    let db = open_db(config)?;

    println!("   Database file: {}", db.path());
    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Try the bot locally: chitieu send --user me chi 12000 cafe");
    println!("  2. Start the webhook: ZALO_BOT_TOKEN=... chitieu serve");

    Ok(())
}
