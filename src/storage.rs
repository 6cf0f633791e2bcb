pub mod database;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repository;

// 只匯出必要的數據庫功能
pub use database::*;
pub use error::{StorageError, StorageResult};

// 匯出主要的模型
pub use models::{Entry, EntryInsert, Hei, SavedChart, User};

// 匯出主要的倉儲接口和實現
pub use repository::{
    EntryRepository, HeiRepository, PageQuery, SavedChartRepository, SqliteEntryRepository,
    SqliteHeiRepository, UserRepository,
};

// 匯出遷移功能
pub use migrations::*;

/// 建立已完成遷移的記憶體資料庫連接池
pub async fn create_test_pool() -> StorageResult<sqlx::SqlitePool> {
    let pool = database::init_memory_pool().await?;
    migrations::run_migrations(&pool).await?;
    Ok(pool)
}
