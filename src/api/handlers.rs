/// HEI 處理器
pub mod hei;
/// 條目處理器
pub mod entry;
/// 首頁與健康檢查
pub mod system;

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::config::RestApiConfig;
use crate::storage::PageQuery;

/// `{"message": "..."}` 回應
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 分頁查詢參數
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PaginationParams {
    /// 套用預設值與上限
    pub fn resolve(&self, config: &RestApiConfig) -> Result<PageQuery, ApiError> {
        let page = self.page.unwrap_or(1);
        let per_page = self.per_page.unwrap_or(config.default_per_page);

        if page < 1 {
            return Err(ApiError::bad_request(format!("page must be at least 1, got {}", page)));
        }
        if per_page < 1 {
            return Err(ApiError::bad_request(format!(
                "per_page must be at least 1, got {}",
                per_page
            )));
        }

        Ok(PageQuery::new(page, per_page.min(config.max_per_page)))
    }
}

/// 解析路徑中的整數主鍵，非數字視為不存在
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
