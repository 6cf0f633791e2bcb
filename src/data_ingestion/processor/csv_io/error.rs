//! CSV 處理錯誤定義

use std::path::PathBuf;
use thiserror::Error;

/// CSV 處理錯誤類型
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("檔案不存在: {0}")]
    NotFound(PathBuf),

    #[error("檔案讀取錯誤: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV 解析錯誤 ({path}, 第 {line} 行): {source}")]
    Row {
        path: String,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("CSV 解析錯誤: {0}")]
    ParseError(#[from] csv::Error),
}

/// CSV 處理結果類型
pub type CsvResult<T> = Result<T, CsvError>;
