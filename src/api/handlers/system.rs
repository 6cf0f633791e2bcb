use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::{error, info};

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    database: String,
}

/// GET /
pub async fn index() -> &'static str {
    info!("Index page requested");
    "Index Page"
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (code, status, database) = match state.heis.count().await {
        Ok(_) => (StatusCode::OK, "ok", "ok"),
        Err(e) => {
            error!("資料庫健康檢查失敗: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    let health_response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    };

    (code, Json(health_response))
}
