//! 密碼雜湊
//!
//! 儲存格式為 `sha256:{iterations}${salt_hex}${hash_hex}`，
//! 每次雜湊使用隨機鹽值並重複迭代 SHA-256。

use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// 預設迭代次數
pub const DEFAULT_ITERATIONS: u32 = 100_000;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// 密碼雜湊錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("密碼不可為空")]
    Empty,

    #[error("無法識別的密碼雜湊格式")]
    InvalidFormat,
}

/// 以預設迭代次數雜湊密碼
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with(password, DEFAULT_ITERATIONS)
}

/// 以指定迭代次數雜湊密碼
pub fn hash_password_with(password: &str, iterations: u32) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let digest = derive(password.as_bytes(), &salt, iterations.max(1));
    Ok(format!(
        "{}:{}${}${}",
        SCHEME,
        iterations.max(1),
        hex::encode(salt),
        hex::encode(digest)
    ))
}

/// 驗證密碼是否與儲存的雜湊相符
///
/// 格式錯誤的雜湊一律視為不相符。
pub fn verify_password(password: &str, stored: &str) -> bool {
    match parse(stored) {
        Ok((iterations, salt, expected)) => {
            let actual = derive(password.as_bytes(), &salt, iterations);
            constant_time_eq(&actual, &expected)
        }
        Err(_) => false,
    }
}

fn parse(stored: &str) -> Result<(u32, Vec<u8>, Vec<u8>), PasswordError> {
    let rest = stored
        .strip_prefix(SCHEME)
        .and_then(|s| s.strip_prefix(':'))
        .ok_or(PasswordError::InvalidFormat)?;

    let mut parts = rest.split('$');
    let (Some(iterations), Some(salt), Some(hash), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(PasswordError::InvalidFormat);
    };

    let iterations: u32 = iterations.parse().map_err(|_| PasswordError::InvalidFormat)?;
    if iterations == 0 {
        return Err(PasswordError::InvalidFormat);
    }
    let salt = hex::decode(salt).map_err(|_| PasswordError::InvalidFormat)?;
    let hash = hex::decode(hash).map_err(|_| PasswordError::InvalidFormat)?;

    Ok((iterations, salt, hash))
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password);
    let mut digest = hasher.finalize();

    for _ in 1..iterations {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(salt);
        digest = hasher.finalize();
    }

    digest.to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
