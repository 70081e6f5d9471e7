//! Zalo Official Account messenger
//!
//! Sends text messages through the OA message API:
//!
//! ```text
//! POST {api_url}?access_token={token}
//! {"recipient": {"user_id": "..."}, "message": {"text": "..."}}
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::Messenger;
use crate::config::BotConfig;
use crate::error::{Error, Result};

/// Request body of the OA message API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: Recipient,
    pub message: MessageText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText {
    pub text: String,
}

impl OutboundMessage {
    pub fn text(user_id: &str, text: &str) -> Self {
        Self {
            recipient: Recipient {
                user_id: user_id.to_string(),
            },
            message: MessageText {
                text: text.to_string(),
            },
        }
    }
}

/// Zalo OA messenger
#[derive(Clone)]
pub struct ZaloMessenger {
    http_client: Client,
    api_url: String,
    access_token: Option<String>,
}

impl ZaloMessenger {
    /// Create a messenger whose sends give up after `timeout`
    pub fn new(api_url: &str, access_token: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url: api_url.to_string(),
            access_token,
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::new(
            &config.message_api_url,
            config.access_token.clone(),
            config.send_timeout,
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }
}

#[async_trait]
impl Messenger for ZaloMessenger {
    async fn send_text(&self, user_id: &str, text: &str) -> Result<()> {
        let Some(token) = self.access_token.as_deref() else {
            error!("No ZALO_BOT_TOKEN set, not sending message");
            return Err(Error::Config("ZALO_BOT_TOKEN is not set".into()));
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .query(&[("access_token", token)])
            .json(&OutboundMessage::text(user_id, text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        info!(status = %status, body = %body, "Send message response");

        if !status.is_success() {
            return Err(Error::Messaging(format!(
                "Message API returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "zalo"
    }
}
