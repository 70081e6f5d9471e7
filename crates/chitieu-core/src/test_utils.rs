//! Test utilities for chitieu-core
//!
//! Provides a mock Zalo message API that records every request, for unit and
//! integration tests of the outbound messenger.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde_json::json;
use tokio::sync::oneshot;

use crate::messaging::OutboundMessage;

/// A request captured by `MockMessagingServer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// The `access_token` query parameter, if any
    pub access_token: Option<String>,
    pub body: OutboundMessage,
}

#[derive(Clone)]
struct MockState {
    received: Arc<Mutex<Vec<ReceivedMessage>>>,
    fail: bool,
}

/// Mock message API server for testing and development
pub struct MockMessagingServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedMessage>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockMessagingServer {
    /// Start a server that accepts every message
    pub async fn start() -> Self {
        Self::spawn(false).await
    }

    /// Start a server that records messages but answers 500
    pub async fn start_failing() -> Self {
        Self::spawn(true).await
    }

    async fn spawn(fail: bool) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            received: received.clone(),
            fail,
        };

        let app = Router::new()
            .route("/message", post(handle_message))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            received,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL of this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL to use as `ZALO_MESSAGE_API_URL`
    pub fn message_url(&self) -> String {
        format!("{}/message", self.url())
    }

    /// Requests received so far, oldest first
    pub fn received(&self) -> Vec<ReceivedMessage> {
        self.received.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockMessagingServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_message(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<OutboundMessage>,
) -> impl IntoResponse {
    state.received.lock().unwrap().push(ReceivedMessage {
        access_token: params.get("access_token").cloned(),
        body,
    });

    if state.fail {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({"error": -216, "message": "Access token is invalid"})),
        )
    } else {
        (
            StatusCode::OK,
            axum::Json(json!({"error": 0, "message": "Success"})),
        )
    }
}
