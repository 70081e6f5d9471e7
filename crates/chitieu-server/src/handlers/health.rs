//! Health check handler

use axum::Json;

use crate::StatusResponse;

/// GET /api/health - Liveness check
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}
