use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::RestApiConfig;
use crate::storage::repository::{
    EntryRepository, HeiRepository, SqliteEntryRepository, SqliteHeiRepository,
};

/// 路由共享狀態
#[derive(Clone)]
pub struct AppState {
    pub heis: Arc<dyn HeiRepository>,
    pub entries: Arc<dyn EntryRepository>,
    pub paging: RestApiConfig,
}

impl AppState {
    pub fn new(
        heis: Arc<dyn HeiRepository>,
        entries: Arc<dyn EntryRepository>,
        paging: RestApiConfig,
    ) -> Self {
        Self {
            heis,
            entries,
            paging,
        }
    }

    /// 以 SQLite 實現建立
    pub fn from_pool(pool: SqlitePool, paging: RestApiConfig) -> Self {
        Self::new(
            Arc::new(SqliteHeiRepository::new(pool.clone())),
            Arc::new(SqliteEntryRepository::new(pool)),
            paging,
        )
    }
}
