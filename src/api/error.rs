// src/api/error.rs
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::storage::StorageError;

/// 500 回應的固定訊息，不洩漏內部原因
pub const INTERNAL_ERROR_MESSAGE: &str = "An Internal Server Error occurred. Please try again later.";

/// 未知路徑的說明文字
pub const NOT_FOUND_DESCRIPTION: &str = "The requested URL was not found on the server. \
If you entered the URL manually please check your spelling and try again.";

const METHOD_NOT_ALLOWED_DESCRIPTION: &str = "The method is not allowed for the requested URL.";

/// API 錯誤類型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 404 `{"message"}`
    #[error("{0}")]
    NotFound(String),

    /// 400 `{"message"}`
    #[error("{0}")]
    Validation(String),

    /// 500，原因只寫入日誌
    #[error("內部錯誤: {0}")]
    Internal(String),

    /// 協定層錯誤，以 `{"code", "name", "description"}` 回應
    #[error("{status}: {description}")]
    Http { status: StatusCode, description: String },
}

impl ApiError {
    pub fn bad_request(description: impl Into<String>) -> Self {
        ApiError::Http {
            status: StatusCode::BAD_REQUEST,
            description: description.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Internal(cause) => {
                error!("請求處理失敗: {}", cause);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response()
            }
            ApiError::Http { status, description } => (
                status,
                Json(json!({
                    "code": status.as_u16(),
                    "name": status.canonical_reason().unwrap_or("Unknown"),
                    "description": description,
                })),
            )
                .into_response(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Http {
            status: rejection.status(),
            description: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Http {
            status: StatusCode::BAD_REQUEST,
            description: rejection.body_text(),
        }
    }
}

/// 未知路徑
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("404 Not Found: {}", NOT_FOUND_DESCRIPTION) })),
    )
        .into_response()
}

/// 已知路徑但方法不支援
pub async fn method_not_allowed() -> Response {
    ApiError::Http {
        status: StatusCode::METHOD_NOT_ALLOWED,
        description: METHOD_NOT_ALLOWED_DESCRIPTION.to_string(),
    }
    .into_response()
}
