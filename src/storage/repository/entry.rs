use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::models::{Entry, EntryInsert};
use crate::storage::repository::{rows_per_statement, DbExecutor, PageQuery};

/// 條目存取接口
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// 依 entry_id 排序分頁列出
    async fn list(&self, page: PageQuery) -> StorageResult<Vec<Entry>>;

    async fn get(&self, entry_id: i64) -> StorageResult<Option<Entry>>;

    /// 新增記錄，未指定 entry_id 時由資料庫分配
    async fn insert(&self, entry: EntryInsert) -> StorageResult<Entry>;

    /// 以記錄本身的 entry_id 新增或整體替換
    async fn upsert(&self, entry: Entry) -> StorageResult<Entry>;

    /// 以 `entry_id` 定位並覆寫整筆記錄，允許變更主鍵
    async fn update(&self, entry_id: i64, entry: Entry) -> StorageResult<Option<Entry>>;

    async fn delete(&self, entry_id: i64) -> StorageResult<bool>;

    async fn count(&self) -> StorageResult<i64>;

    /// 在單一事務中分批寫入，返回寫入筆數
    async fn insert_batch(&self, entries: Vec<EntryInsert>, batch_size: usize) -> StorageResult<usize>;
}

/// SQLite 條目存取實現
#[derive(Clone)]
pub struct SqliteEntryRepository {
    pool: SqlitePool,
}

impl SqliteEntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DbExecutor for SqliteEntryRepository {
    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

const ENTRY_COLUMNS: &str =
    "entry_id, academic_year, classification, category_marker, category, value, ukprn, he_name";
const ENTRY_COLUMN_COUNT: usize = 8;

#[async_trait]
impl EntryRepository for SqliteEntryRepository {
    async fn list(&self, page: PageQuery) -> StorageResult<Vec<Entry>> {
        let sql = format!(
            "SELECT {} FROM entry ORDER BY entry_id LIMIT ? OFFSET ?",
            ENTRY_COLUMNS
        );
        let records = sqlx::query_as::<_, Entry>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.get_pool())
            .await?;

        Ok(records)
    }

    async fn get(&self, entry_id: i64) -> StorageResult<Option<Entry>> {
        let sql = format!("SELECT {} FROM entry WHERE entry_id = ?", ENTRY_COLUMNS);
        let record = sqlx::query_as::<_, Entry>(&sql)
            .bind(entry_id)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(record)
    }

    async fn insert(&self, entry: EntryInsert) -> StorageResult<Entry> {
        let sql = format!(
            r#"
            INSERT INTO entry ({cols})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {cols}
            "#,
            cols = ENTRY_COLUMNS
        );
        let record = sqlx::query_as::<_, Entry>(&sql)
            .bind(entry.entry_id)
            .bind(&entry.academic_year)
            .bind(&entry.classification)
            .bind(&entry.category_marker)
            .bind(&entry.category)
            .bind(&entry.value)
            .bind(entry.ukprn)
            .bind(&entry.he_name)
            .fetch_one(self.get_pool())
            .await?;

        Ok(record)
    }

    async fn upsert(&self, entry: Entry) -> StorageResult<Entry> {
        let mut tx = self.get_pool().begin().await?;

        let update_sql = format!(
            r#"
            UPDATE entry
            SET academic_year = ?, classification = ?, category_marker = ?,
                category = ?, value = ?, ukprn = ?, he_name = ?
            WHERE entry_id = ?
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        );
        let updated = sqlx::query_as::<_, Entry>(&update_sql)
            .bind(&entry.academic_year)
            .bind(&entry.classification)
            .bind(&entry.category_marker)
            .bind(&entry.category)
            .bind(&entry.value)
            .bind(entry.ukprn)
            .bind(&entry.he_name)
            .bind(entry.entry_id)
            .fetch_optional(&mut *tx)
            .await?;

        let record = match updated {
            Some(record) => record,
            None => {
                let insert_sql = format!(
                    "INSERT INTO entry ({cols}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {cols}",
                    cols = ENTRY_COLUMNS
                );
                sqlx::query_as::<_, Entry>(&insert_sql)
                    .bind(entry.entry_id)
                    .bind(&entry.academic_year)
                    .bind(&entry.classification)
                    .bind(&entry.category_marker)
                    .bind(&entry.category)
                    .bind(&entry.value)
                    .bind(entry.ukprn)
                    .bind(&entry.he_name)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(record)
    }

    async fn update(&self, entry_id: i64, entry: Entry) -> StorageResult<Option<Entry>> {
        let sql = format!(
            r#"
            UPDATE entry
            SET entry_id = ?, academic_year = ?, classification = ?, category_marker = ?,
                category = ?, value = ?, ukprn = ?, he_name = ?
            WHERE entry_id = ?
            RETURNING {}
            "#,
            ENTRY_COLUMNS
        );
        let record = sqlx::query_as::<_, Entry>(&sql)
            .bind(entry.entry_id)
            .bind(&entry.academic_year)
            .bind(&entry.classification)
            .bind(&entry.category_marker)
            .bind(&entry.category)
            .bind(&entry.value)
            .bind(entry.ukprn)
            .bind(&entry.he_name)
            .bind(entry_id)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(record)
    }

    async fn delete(&self, entry_id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM entry WHERE entry_id = ?")
            .bind(entry_id)
            .execute(self.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StorageResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entry")
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    async fn insert_batch(&self, entries: Vec<EntryInsert>, batch_size: usize) -> StorageResult<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        if batch_size == 0 {
            return Err(StorageError::Invalid("batch_size 必須大於 0".to_string()));
        }

        let mut tx = self.get_pool().begin().await?;
        let mut inserted = 0usize;

        for chunk in entries.chunks(rows_per_statement(batch_size, ENTRY_COLUMN_COUNT)) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("INSERT INTO entry ({}) ", ENTRY_COLUMNS));
            builder.push_values(chunk, |mut row, entry| {
                row.push_bind(entry.entry_id)
                    .push_bind(&entry.academic_year)
                    .push_bind(&entry.classification)
                    .push_bind(&entry.category_marker)
                    .push_bind(&entry.category)
                    .push_bind(&entry.value)
                    .push_bind(entry.ukprn)
                    .push_bind(&entry.he_name);
            });

            let result = builder.build().execute(&mut *tx).await?;
            inserted += result.rows_affected() as usize;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
