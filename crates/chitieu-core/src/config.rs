//! Process configuration
//!
//! Read once at startup and passed into the constructors that need it.
//!
//! Environment variables:
//! - `ZALO_BOT_TOKEN`: OA access token (optional; replies are skipped without it)
//! - `DATABASE_URL`: `sqlite:///<relative path>`, `sqlite:////<absolute path>` or a plain path
//!   (default: `sqlite:////tmp/chitieu.sqlite3`)
//! - `ZALO_MESSAGE_API_URL`: message endpoint override
//! - `ZALO_SEND_TIMEOUT_SECS`: outbound send timeout (default: 8)
//! - `MESSENGER_BACKEND`: `zalo` (default) or `mock`

use std::time::Duration;

use tracing::warn;

/// Zalo Official Account message endpoint
pub const ZALO_MESSAGE_API_URL: &str = "https://openapi.zalo.me/v2.0/oa/message";

/// Database used when `DATABASE_URL` is not set (ephemeral, development only)
pub const DEFAULT_DATABASE_URL: &str = "sqlite:////tmp/chitieu.sqlite3";

pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(8);

/// Which messaging backend delivers replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessengerKind {
    #[default]
    Zalo,
    Mock,
}

impl std::str::FromStr for MessengerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zalo" => Ok(Self::Zalo),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown messenger backend: {}", s)),
        }
    }
}

/// Bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub access_token: Option<String>,
    pub database_url: String,
    pub message_api_url: String,
    pub send_timeout: Duration,
    pub messenger: MessengerKind,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            message_api_url: ZALO_MESSAGE_API_URL.to_string(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
            messenger: MessengerKind::default(),
        }
    }
}

impl BotConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup (environment, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let send_timeout = match get("ZALO_SEND_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "Invalid ZALO_SEND_TIMEOUT_SECS, using default");
                    defaults.send_timeout
                }
            },
            None => defaults.send_timeout,
        };

        let messenger = match get("MESSENGER_BACKEND") {
            Some(raw) => raw.parse::<MessengerKind>().unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to zalo messenger");
                MessengerKind::Zalo
            }),
            None => defaults.messenger,
        };

        Self {
            access_token: get("ZALO_BOT_TOKEN"),
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            message_api_url: get("ZALO_MESSAGE_API_URL").unwrap_or(defaults.message_api_url),
            send_timeout,
            messenger,
        }
    }
}
