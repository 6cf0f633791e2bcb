// 模組定義
pub mod api;
pub mod auth;
pub mod config;
pub mod data_ingestion;
pub mod logging;
pub mod server;
pub mod storage;
pub mod utils;
