use thiserror::Error;

use crate::data_ingestion::SeedError;
use crate::storage::StorageError;

/// 伺服器錯誤類型
#[derive(Error, Debug)]
pub enum ServerError {
    /// 配置錯誤
    #[error("配置錯誤: {0}")]
    Config(String),

    /// 儲存層錯誤
    #[error("儲存層錯誤: {0}")]
    Storage(#[from] StorageError),

    /// 初始資料匯入錯誤
    #[error("資料匯入錯誤: {0}")]
    Seed(#[from] SeedError),

    /// IO 錯誤
    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),

    /// 運行時錯誤
    #[error("運行時錯誤: {0}")]
    Runtime(String),
}

/// 伺服器結果類型別名
pub type ServerResult<T> = Result<T, ServerError>;
