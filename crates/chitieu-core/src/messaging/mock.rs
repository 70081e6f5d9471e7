//! Mock messenger for testing
//!
//! Records every message instead of delivering it. Useful for unit tests and
//! local development without a messaging platform account.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::Messenger;
use crate::error::{Error, Result};

/// A message captured by `MockMessenger`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMessage {
    pub user_id: String,
    pub text: String,
}

/// Mock messenger
///
/// Clones share the same message log, so a test can keep a handle while the
/// server owns another.
#[derive(Clone, Default)]
pub struct MockMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    /// When set, every send fails with this message
    failure: Option<String>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A messenger whose sends always fail
    pub fn failing(message: &str) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(message.to_string()),
        }
    }

    /// Messages sent so far, oldest first
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Text of the most recent message
    pub fn last_text(&self) -> Option<String> {
        self.sent().pop().map(|m| m.text)
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_text(&self, user_id: &str, text: &str) -> Result<()> {
        if let Some(failure) = &self.failure {
            return Err(Error::Messaging(failure.clone()));
        }

        info!(user_id, text, "Mock send");
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| Error::Messaging("mock message log poisoned".into()))?;
        sent.push(SentMessage {
            user_id: user_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
