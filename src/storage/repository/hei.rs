use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::models::Hei;
use crate::storage::repository::{rows_per_statement, DbExecutor, PageQuery};

/// 高等教育機構存取接口
#[async_trait]
pub trait HeiRepository: Send + Sync {
    /// 依 UKPRN 排序分頁列出
    async fn list(&self, page: PageQuery) -> StorageResult<Vec<Hei>>;

    async fn get(&self, ukprn: i64) -> StorageResult<Option<Hei>>;

    /// 新增記錄，UKPRN 已存在時返回唯一約束錯誤
    async fn insert(&self, hei: Hei) -> StorageResult<Hei>;

    /// 以記錄本身的 UKPRN 新增或整體替換
    async fn upsert(&self, hei: Hei) -> StorageResult<Hei>;

    /// 以 `ukprn` 定位並覆寫整筆記錄，允許變更主鍵
    async fn update(&self, ukprn: i64, hei: Hei) -> StorageResult<Option<Hei>>;

    async fn delete(&self, ukprn: i64) -> StorageResult<bool>;

    async fn count(&self) -> StorageResult<i64>;

    /// 在單一事務中分批寫入，返回寫入筆數
    async fn insert_batch(&self, heis: Vec<Hei>, batch_size: usize) -> StorageResult<usize>;
}

/// SQLite 高等教育機構存取實現
#[derive(Clone)]
pub struct SqliteHeiRepository {
    pool: SqlitePool,
}

impl SqliteHeiRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DbExecutor for SqliteHeiRepository {
    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl HeiRepository for SqliteHeiRepository {
    async fn list(&self, page: PageQuery) -> StorageResult<Vec<Hei>> {
        let records = sqlx::query_as::<_, Hei>(
            r#"
            SELECT ukprn, he_name, region, lat, lon
            FROM hei
            ORDER BY ukprn
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.get_pool())
        .await?;

        Ok(records)
    }

    async fn get(&self, ukprn: i64) -> StorageResult<Option<Hei>> {
        let record = sqlx::query_as::<_, Hei>(
            r#"
            SELECT ukprn, he_name, region, lat, lon
            FROM hei
            WHERE ukprn = ?
            "#,
        )
        .bind(ukprn)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(record)
    }

    async fn insert(&self, hei: Hei) -> StorageResult<Hei> {
        let record = sqlx::query_as::<_, Hei>(
            r#"
            INSERT INTO hei (ukprn, he_name, region, lat, lon)
            VALUES (?, ?, ?, ?, ?)
            RETURNING ukprn, he_name, region, lat, lon
            "#,
        )
        .bind(hei.ukprn)
        .bind(&hei.he_name)
        .bind(&hei.region)
        .bind(&hei.lat)
        .bind(&hei.lon)
        .fetch_one(self.get_pool())
        .await?;

        Ok(record)
    }

    async fn upsert(&self, hei: Hei) -> StorageResult<Hei> {
        let mut tx = self.get_pool().begin().await?;

        let updated = sqlx::query_as::<_, Hei>(
            r#"
            UPDATE hei
            SET he_name = ?, region = ?, lat = ?, lon = ?
            WHERE ukprn = ?
            RETURNING ukprn, he_name, region, lat, lon
            "#,
        )
        .bind(&hei.he_name)
        .bind(&hei.region)
        .bind(&hei.lat)
        .bind(&hei.lon)
        .bind(hei.ukprn)
        .fetch_optional(&mut *tx)
        .await?;

        let record = match updated {
            Some(record) => record,
            None => {
                debug!("UKPRN {} 不存在，新增記錄", hei.ukprn);
                sqlx::query_as::<_, Hei>(
                    r#"
                    INSERT INTO hei (ukprn, he_name, region, lat, lon)
                    VALUES (?, ?, ?, ?, ?)
                    RETURNING ukprn, he_name, region, lat, lon
                    "#,
                )
                .bind(hei.ukprn)
                .bind(&hei.he_name)
                .bind(&hei.region)
                .bind(&hei.lat)
                .bind(&hei.lon)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok(record)
    }

    async fn update(&self, ukprn: i64, hei: Hei) -> StorageResult<Option<Hei>> {
        let record = sqlx::query_as::<_, Hei>(
            r#"
            UPDATE hei
            SET ukprn = ?, he_name = ?, region = ?, lat = ?, lon = ?
            WHERE ukprn = ?
            RETURNING ukprn, he_name, region, lat, lon
            "#,
        )
        .bind(hei.ukprn)
        .bind(&hei.he_name)
        .bind(&hei.region)
        .bind(&hei.lat)
        .bind(&hei.lon)
        .bind(ukprn)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(record)
    }

    async fn delete(&self, ukprn: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM hei WHERE ukprn = ?")
            .bind(ukprn)
            .execute(self.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StorageResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hei")
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    async fn insert_batch(&self, heis: Vec<Hei>, batch_size: usize) -> StorageResult<usize> {
        if heis.is_empty() {
            return Ok(0);
        }
        if batch_size == 0 {
            return Err(StorageError::Invalid("batch_size 必須大於 0".to_string()));
        }

        let mut tx = self.get_pool().begin().await?;
        let mut inserted = 0usize;

        // ukprn, he_name, region, lat, lon
        for chunk in heis.chunks(rows_per_statement(batch_size, 5)) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO hei (ukprn, he_name, region, lat, lon) ");
            builder.push_values(chunk, |mut row, hei| {
                row.push_bind(hei.ukprn)
                    .push_bind(&hei.he_name)
                    .push_bind(&hei.region)
                    .push_bind(&hei.lat)
                    .push_bind(&hei.lon);
            });

            let result = builder.build().execute(&mut *tx).await?;
            inserted += result.rows_affected() as usize;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::create_test_pool;

    fn hei(ukprn: i64, name: &str) -> Hei {
        Hei {
            ukprn,
            he_name: name.to_string(),
            region: "London".to_string(),
            lat: None,
            lon: None,
        }
    }

    async fn repo() -> SqliteHeiRepository {
        SqliteHeiRepository::new(create_test_pool().await.unwrap())
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let repo = repo().await;

        let created = repo.insert(hei(10000001, "Alpha")).await.unwrap();
        assert_eq!(created.he_name, "Alpha");
        assert_eq!(repo.get(10000001).await.unwrap(), Some(created));

        assert!(repo.delete(10000001).await.unwrap());
        assert!(!repo.delete(10000001).await.unwrap());
        assert_eq!(repo.get(10000001).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_unique_violation() {
        let repo = repo().await;
        repo.insert(hei(1, "Alpha")).await.unwrap();

        let err = repo.insert(hei(1, "Alpha")).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_paged() {
        let repo = repo().await;
        let rows = vec![hei(3, "C"), hei(1, "A"), hei(2, "B"), hei(4, "D")];
        assert_eq!(repo.insert_batch(rows, 3).await.unwrap(), 4);
        assert_eq!(repo.count().await.unwrap(), 4);

        let first = repo.list(PageQuery::new(1, 3)).await.unwrap();
        let ids: Vec<i64> = first.iter().map(|h| h.ukprn).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let second = repo.list(PageQuery::new(2, 3)).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].ukprn, 4);

        assert!(repo.list(PageQuery::new(5, 3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_replaces() {
        let repo = repo().await;

        repo.upsert(hei(7, "Seven")).await.unwrap();
        let mut replacement = hei(7, "Seven Renamed");
        replacement.lat = Some("51.5".to_string());
        let stored = repo.upsert(replacement.clone()).await.unwrap();

        assert_eq!(stored, replacement);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_can_change_key() {
        let repo = repo().await;
        repo.insert(hei(8, "Eight")).await.unwrap();

        let moved = repo.update(8, hei(9, "Eight")).await.unwrap();
        assert_eq!(moved.map(|h| h.ukprn), Some(9));
        assert_eq!(repo.get(8).await.unwrap(), None);

        assert_eq!(repo.update(100, hei(100, "Missing")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_batch_rolls_back_on_conflict() {
        let repo = repo().await;
        let rows = vec![hei(1, "A"), hei(2, "B"), hei(1, "A again")];

        assert!(repo.insert_batch(rows, 2).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
