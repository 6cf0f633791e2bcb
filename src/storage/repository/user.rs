use sqlx::SqlitePool;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::models::{NewUser, User};
use crate::storage::repository::DbExecutor;

/// 使用者數據庫操作
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 建立使用者，電子郵件重複時返回唯一約束錯誤
    pub async fn create(&self, user: NewUser) -> StorageResult<User> {
        let record = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "user" (email, password_hash)
            VALUES (?, ?)
            RETURNING user_id, email, password_hash
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_by_id(&self, user_id: i64) -> StorageResult<Option<User>> {
        let record = sqlx::query_as::<_, User>(
            r#"SELECT user_id, email, password_hash FROM "user" WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let record = sqlx::query_as::<_, User>(
            r#"SELECT user_id, email, password_hash FROM "user" WHERE email = ?"#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// 儲存使用者目前的密碼雜湊
    pub async fn update_password(&self, user: &User) -> StorageResult<()> {
        let result = sqlx::query(r#"UPDATE "user" SET password_hash = ? WHERE user_id = ?"#)
            .bind(&user.password_hash)
            .bind(user.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Missing(format!("user_id {}", user.user_id)));
        }
        Ok(())
    }

    /// 刪除使用者及其所有圖表
    pub async fn delete(&self, user_id: i64) -> StorageResult<bool> {
        let mut tx = self.pool.begin().await?;

        // 外鍵預設未啟用，不能依賴 ON DELETE CASCADE
        sqlx::query("DELETE FROM saved_chart WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(r#"DELETE FROM "user" WHERE user_id = ?"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

impl DbExecutor for UserRepository {
    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}
