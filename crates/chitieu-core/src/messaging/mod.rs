//! Outbound messaging backends
//!
//! Replies are delivered through a `Messenger`. Delivery is fire-and-forget:
//! callers log failures and never retry.
//!
//! # Architecture
//!
//! - `Messenger` trait: the single "send text to user" operation
//! - `MessagingClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `ZaloMessenger`, `MockMessenger`

mod mock;
mod zalo;

pub use mock::{MockMessenger, SentMessage};
pub use zalo::{OutboundMessage, ZaloMessenger};

use async_trait::async_trait;

use crate::config::{BotConfig, MessengerKind};
use crate::error::Result;

/// Trait defining the outbound messaging capability
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a text message to a user
    async fn send_text(&self, user_id: &str, text: &str) -> Result<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Messaging client that wraps any backend
#[derive(Clone)]
pub enum MessagingClient {
    Zalo(ZaloMessenger),
    Mock(MockMessenger),
}

impl MessagingClient {
    /// Build the backend selected by the configuration
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        match config.messenger {
            MessengerKind::Zalo => Ok(MessagingClient::Zalo(ZaloMessenger::from_config(config)?)),
            MessengerKind::Mock => Ok(MessagingClient::Mock(MockMessenger::new())),
        }
    }

    pub fn mock() -> Self {
        MessagingClient::Mock(MockMessenger::new())
    }
}

#[async_trait]
impl Messenger for MessagingClient {
    async fn send_text(&self, user_id: &str, text: &str) -> Result<()> {
        match self {
            MessagingClient::Zalo(m) => m.send_text(user_id, text).await,
            MessagingClient::Mock(m) => m.send_text(user_id, text).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            MessagingClient::Zalo(m) => m.name(),
            MessagingClient::Mock(m) => m.name(),
        }
    }
}
