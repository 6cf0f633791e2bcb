use crate::config::DatabaseConfig;
use crate::storage::error::StorageResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use tracing::{debug, info};

/// 依配置建立連線選項
pub fn connect_options(config: &DatabaseConfig) -> StorageResult<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(config.foreign_keys)
        .disable_statement_logging();

    Ok(options)
}

/// 初始化資料庫連接池
pub async fn init_db_pool(config: &DatabaseConfig) -> StorageResult<SqlitePool> {
    let options = connect_options(config)?;

    // 檔案資料庫需要先建立所在目錄
    if !config.is_in_memory() {
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("建立資料庫目錄: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let pool = if config.is_in_memory() {
        // 每個記憶體連線都是獨立的資料庫，只能保留單一長期連線
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(config.max_lifetime())
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect_with(options)
            .await?
    };

    // 測試連接
    sqlx::query("SELECT 1").execute(&pool).await?;
    info!("資料庫連接池已建立: {}", config.url);

    Ok(pool)
}

/// 建立記憶體資料庫連接池
pub async fn init_memory_pool() -> StorageResult<SqlitePool> {
    init_db_pool(&DatabaseConfig::in_memory()).await
}

/// 健康檢查
pub async fn health_check(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
}
