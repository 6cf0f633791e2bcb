// 重新導出子模塊
pub mod entry;
pub mod hei;
pub mod saved_chart;
pub mod user;

// 重新導出常用類型
pub use entry::{EntryRepository, SqliteEntryRepository};
pub use hei::{HeiRepository, SqliteHeiRepository};
pub use saved_chart::SavedChartRepository;
pub use user::UserRepository;

use sqlx::SqlitePool;

/// 查詢分頁參數，頁碼從 1 開始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: i64,
    pub page_size: i64,
}

impl PageQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// 跳過的記錄數
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.page_size.max(0))
    }

    /// 本頁最多返回的記錄數
    pub fn limit(&self) -> i64 {
        self.page_size.max(0)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

/// SQLite 單一語句可綁定的參數上限
pub(crate) const SQLITE_MAX_BIND_PARAMS: usize = 32_766;

/// 每個 INSERT 語句實際寫入的筆數，不超過綁定參數上限
pub(crate) fn rows_per_statement(batch_size: usize, columns: usize) -> usize {
    batch_size.min(SQLITE_MAX_BIND_PARAMS / columns.max(1)).max(1)
}

/// 數據庫執行器特性
pub trait DbExecutor {
    fn get_pool(&self) -> &SqlitePool;
}
