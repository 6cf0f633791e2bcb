use chrono::{DateTime, Utc};
use sqlx::{migrate::Migrator, SqlitePool};
use tracing::info;

use crate::storage::error::StorageResult;

// 靜態嵌入遷移目錄（此目錄應放在專案根目錄）
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 已套用的遷移記錄
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
    pub success: bool,
    pub installed_on: DateTime<Utc>,
}

/// 執行數據庫遷移
pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    info!("開始執行數據庫遷移...");

    // 使用 sqlx::migrate!() 自動執行所有嵌入的 SQL 檔案
    MIGRATOR.run(pool).await?;
    info!("SQLx 遷移完成");
    Ok(())
}

/// 嵌入的遷移數量
pub fn embedded_migration_count() -> usize {
    MIGRATOR.iter().count()
}

/// 查詢已套用的遷移，尚未遷移過的資料庫返回空列表
pub async fn applied_migrations(pool: &SqlitePool) -> StorageResult<Vec<AppliedMigration>> {
    let table_exists: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_optional(pool)
    .await?;

    if table_exists.is_none() {
        return Ok(Vec::new());
    }

    let records = sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, description, success, installed_on FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await?;

    Ok(records)
}
