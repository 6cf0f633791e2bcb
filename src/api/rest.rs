// src/api/rest.rs
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn};

use super::{error, routes::api_routes, state::AppState};
use crate::config::{RestApiConfig, ServerConfig};

/// 組裝完整的路由與中間件
pub fn build_router(state: AppState, server_config: &ServerConfig, api_config: &RestApiConfig) -> Router {
    let base_path = api_config.base_path.trim_end_matches('/');

    let router = if base_path.is_empty() {
        api_routes()
    } else {
        Router::new().nest(base_path, api_routes())
    };

    let mut app = router
        .fallback(error::not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
        .with_state(state)
        // 超時設置
        .layer(TimeoutLayer::new(Duration::from_secs(server_config.request_timeout)));

    // 壓縮
    if server_config.enable_compression {
        app = app.layer(CompressionLayer::new());
    }

    // CORS
    if server_config.enable_cors {
        app = app.layer(build_cors_layer(server_config));
    }

    // 追蹤層放在最外層，記錄所有請求
    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().include_headers(false))
            .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
    )
}

fn build_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(vec![header::CONTENT_TYPE]);

    let origins = server_config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("忽略無效的 CORS 來源: {}", origin);
                None
            }
        })
        .collect::<Vec<_>>();

    cors.allow_origin(origins)
}

pub struct RestApi {
    server_config: ServerConfig,
    api_config: RestApiConfig,
}

impl RestApi {
    pub fn new(server_config: ServerConfig, api_config: RestApiConfig) -> Self {
        Self {
            server_config,
            api_config,
        }
    }

    /// 監聽地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.server_config.host, self.server_config.port)
    }

    pub fn router(&self, state: AppState) -> Router {
        build_router(state, &self.server_config, &self.api_config)
    }

    /// 在既有的監聽器上服務
    pub async fn serve<F>(self, listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router(state);

        info!("Starting REST API server on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
