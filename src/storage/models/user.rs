use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::{self, PasswordError};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// 使用者模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// 重新設定密碼
    pub fn set_password(&mut self, password: &str) -> Result<(), PasswordError> {
        self.password_hash = auth::hash_password(password)?;
        Ok(())
    }

    /// 檢查密碼是否正確
    pub fn check_password(&self, password: &str) -> bool {
        auth::verify_password(password, &self.password_hash)
    }
}

/// 使用者建立錯誤
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NewUserError {
    #[error("無效的電子郵件地址: {0}")]
    InvalidEmail(String),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// 使用者插入模型
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// 驗證電子郵件並雜湊密碼
    pub fn new(email: &str, password: &str) -> Result<Self, NewUserError> {
        Self::with_iterations(email, password, auth::DEFAULT_ITERATIONS)
    }

    /// 以指定迭代次數建立，主要供測試縮短雜湊時間
    pub fn with_iterations(email: &str, password: &str, iterations: u32) -> Result<Self, NewUserError> {
        let email = email.trim();
        if !EMAIL_RE.is_match(email) {
            return Err(NewUserError::InvalidEmail(email.to_string()));
        }

        Ok(Self {
            email: email.to_string(),
            password_hash: auth::hash_password_with(password, iterations)?,
        })
    }
}
