//! Chitieu Web Server
//!
//! Axum-based webhook endpoint for the Chitieu chat bot.
//!
//! The messaging platform posts every chat message to `/api/webhook`. The
//! server runs it through the bot, sends the reply back through the
//! configured messenger and always acknowledges with `{"status": "ok"}`, so
//! the platform never retries a delivery.

use std::sync::Arc;

use axum::{routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use chitieu_core::bot::ExpenseBot;
use chitieu_core::db::Database;
use chitieu_core::messaging::{Messenger, MessagingClient};

mod handlers;

/// Shared application state
pub struct AppState {
    pub bot: ExpenseBot,
    pub messenger: MessagingClient,
}

/// Body of every acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Create the application router
pub fn create_router(db: Database, messenger: MessagingClient) -> Router {
    let state = Arc::new(AppState {
        bot: ExpenseBot::new(db),
        messenger,
    });

    let api_routes = Router::new()
        .route(
            "/webhook",
            get(handlers::receive_webhook).post(handlers::receive_webhook),
        )
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the server
pub async fn serve(
    db: Database,
    messenger: MessagingClient,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    info!(
        database = %db.path(),
        messenger = messenger.name(),
        "Webhook server configured"
    );

    let app = create_router(db, messenger);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
