use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 使用者儲存的圖表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SavedChart {
    pub chart_id: i64,
    pub chart_name: Option<String>,
    /// 圖表的二進位內容
    pub chart: Option<Vec<u8>>,
    pub user_id: i64,
}

/// 圖表插入模型
#[derive(Debug, Clone, Default)]
pub struct SavedChartInsert {
    pub chart_name: Option<String>,
    pub chart: Option<Vec<u8>>,
    pub user_id: i64,
}
