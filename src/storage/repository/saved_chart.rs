use sqlx::SqlitePool;

use crate::storage::error::StorageResult;
use crate::storage::models::{SavedChart, SavedChartInsert};
use crate::storage::repository::DbExecutor;

/// 使用者圖表數據庫操作
#[derive(Clone)]
pub struct SavedChartRepository {
    pool: SqlitePool,
}

impl SavedChartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, chart: SavedChartInsert) -> StorageResult<SavedChart> {
        let record = sqlx::query_as::<_, SavedChart>(
            r#"
            INSERT INTO saved_chart (chart_name, chart, user_id)
            VALUES (?, ?, ?)
            RETURNING chart_id, chart_name, chart, user_id
            "#,
        )
        .bind(&chart.chart_name)
        .bind(&chart.chart)
        .bind(chart.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_by_id(&self, chart_id: i64) -> StorageResult<Option<SavedChart>> {
        let record = sqlx::query_as::<_, SavedChart>(
            "SELECT chart_id, chart_name, chart, user_id FROM saved_chart WHERE chart_id = ?",
        )
        .bind(chart_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// 列出使用者的所有圖表
    pub async fn list_by_user(&self, user_id: i64) -> StorageResult<Vec<SavedChart>> {
        let records = sqlx::query_as::<_, SavedChart>(
            r#"
            SELECT chart_id, chart_name, chart, user_id
            FROM saved_chart
            WHERE user_id = ?
            ORDER BY chart_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn delete(&self, chart_id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM saved_chart WHERE chart_id = ?")
            .bind(chart_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl DbExecutor for SavedChartRepository {
    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}
