//! Webhook handler
//!
//! Payloads are decoded leniently: the body is read as raw bytes and only
//! the sender id and message text are looked up. Anything that cannot be
//! used is acknowledged and dropped.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use chrono::Local;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use chitieu_core::messaging::Messenger;
use chitieu_core::reply;

use crate::{AppState, StatusResponse};

/// The parts of a platform event the bot uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub user_id: String,
    pub text: String,
}

/// Decode a request body, `None` when it is empty or not JSON
pub fn parse_payload(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("Webhook called without a body");
        return None;
    }

    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(error = %e, "Cannot parse incoming body");
            None
        }
    }
}

/// Pull the sender and text out of an event
///
/// The sender is `sender.user_id`, falling back to a top-level `sender_id`.
/// The text is `message.text`, trimmed, empty when absent.
pub fn extract_message(payload: &Value) -> Option<InboundMessage> {
    let user_id = id_string(payload.pointer("/sender/user_id"))
        .or_else(|| id_string(payload.get("sender_id")))?;

    let text = payload
        .pointer("/message/text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(InboundMessage { user_id, text })
}

// Ids arrive as strings or bare numbers
fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// GET|POST /api/webhook - Receive a chat event
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<StatusResponse> {
    let Some(payload) = parse_payload(&body) else {
        return Json(StatusResponse::ok());
    };
    info!(payload = %payload, "Incoming webhook");

    let Some(message) = extract_message(&payload) else {
        debug!("Webhook event has no sender, ignoring");
        return Json(StatusResponse::ok());
    };

    let today = Local::now().date_naive();
    let reply_text = match state.bot.process(&message.user_id, &message.text, today) {
        Ok(outcome) => outcome.reply_text(),
        Err(e) => {
            error!(user_id = %message.user_id, error = %e, "Failed to process message");
            reply::INTERNAL_ERROR.to_string()
        }
    };

    if let Err(e) = state
        .messenger
        .send_text(&message.user_id, &reply_text)
        .await
    {
        warn!(
            user_id = %message.user_id,
            messenger = state.messenger.name(),
            error = %e,
            "Failed to send reply"
        );
    }

    Json(StatusResponse::ok())
}
