use thiserror::Error;

/// 儲存層錯誤類型
#[derive(Error, Debug)]
pub enum StorageError {
    /// 資料庫操作錯誤
    #[error("資料庫錯誤: {0}")]
    Database(#[from] sqlx::Error),

    /// 遷移錯誤
    #[error("資料庫遷移錯誤: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// IO 錯誤（建立資料庫目錄等）
    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),

    /// 寫入後找不到記錄
    #[error("記錄不存在: {0}")]
    Missing(String),

    /// 模型資料無效
    #[error("無效的資料: {0}")]
    Invalid(String),
}

impl StorageError {
    /// 是否為唯一約束衝突
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

/// 儲存層結果類型別名
pub type StorageResult<T> = Result<T, StorageError>;
