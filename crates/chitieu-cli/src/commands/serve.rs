//! Server command implementation

use anyhow::{Context, Result};
use chitieu_core::config::BotConfig;
use chitieu_core::messaging::{Messenger, MessagingClient};
use tracing::warn;

use super::open_db;

/// Port used when neither `--port` nor `PORT` is set
pub const DEFAULT_PORT: u16 = 5000;

/// Pick the listening port: flag, then `PORT`, then the default
pub fn resolve_port(flag: Option<u16>, env_port: Option<&str>) -> u16 {
    if let Some(port) = flag {
        return port;
    }
    match env_port.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = %raw, "Invalid PORT, using {}", DEFAULT_PORT);
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}

pub async fn cmd_serve(config: &BotConfig, host: &str, port: Option<u16>) -> Result<()> {
    let port = resolve_port(port, std::env::var("PORT").ok().as_deref());
    let db = open_db(config)?;
    let messenger =
        MessagingClient::from_config(config).context("Failed to create messaging client")?;

    println!("🚀 Starting Chitieu webhook server...");
    println!("   Database: {}", db.path());
    println!("   Messenger: {}", messenger.name());
    println!("   Listening: http://{}:{}/api/webhook", host, port);
    if config.access_token.is_none() {
        println!();
        println!("   ⚠️  ZALO_BOT_TOKEN not set - replies will not be delivered");
    }
    println!();

    chitieu_server::serve(db, messenger, host, port).await
}
