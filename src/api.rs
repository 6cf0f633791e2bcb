// api.rs - API服務模組，宣告子模組
//
// 提供 HEI 與 Estates Management Record 條目的 REST 接口。

/// REST API實現
pub mod rest;
/// API錯誤與回應格式
pub mod error;
/// 路由共享狀態
pub mod state;
/// API路由定義
pub mod routes;
/// API處理器模組
pub mod handlers;

pub use error::ApiError;
pub use rest::{build_router, RestApi};
pub use state::AppState;
