//! CSV 檔案讀取器
//!
//! 欄位依位置對應，首行視為標題並略過。空白欄位讀為 `None`。

use super::error::{CsvError, CsvResult};
use crate::storage::models::{EntryInsert, Hei};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV 讀取器配置
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// 是否有標題行
    pub has_header: bool,
    /// 分隔符
    pub separator: u8,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            separator: b',',
        }
    }
}

/// CSV 檔案讀取器
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    config: CsvReaderConfig,
}

impl CsvReader {
    /// 創建新的 CSV 讀取器
    pub fn new(config: CsvReaderConfig) -> Self {
        Self { config }
    }

    /// 設定分隔符
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.config.separator = separator;
        self
    }

    /// 設定是否有標題行
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.config.has_header = has_header;
        self
    }

    /// 讀取 `hei_data.csv` 格式：UKPRN, he_name, region, lat, lon
    pub fn read_heis<P: AsRef<Path>>(&self, path: P) -> CsvResult<Vec<Hei>> {
        self.read_file(path)
    }

    /// 讀取 `entry_data.csv` 格式：entry_id, academic_year, classification,
    /// category_marker, category, value, UKPRN, he_name
    pub fn read_entries<P: AsRef<Path>>(&self, path: P) -> CsvResult<Vec<EntryInsert>> {
        self.read_file(path)
    }

    /// 從檔案路徑讀取並依位置反序列化每一行
    pub fn read_file<T, P>(&self, path: P) -> CsvResult<Vec<T>>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CsvError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        self.read_from(file, &path.display().to_string())
    }

    /// 從任意來源讀取，`source_name` 只用於錯誤訊息
    pub fn read_from<T, R>(&self, input: R, source_name: &str) -> CsvResult<Vec<T>>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.config.has_header)
            .delimiter(self.config.separator)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            // 空白行
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let row = record.deserialize::<T>(None).map_err(|source| CsvError::Row {
                path: source_name.to_string(),
                line,
                source,
            })?;
            rows.push(row);
        }

        Ok(rows)
    }

    /// 從字串讀取 CSV
    pub fn read_string<T: DeserializeOwned>(&self, data: &str) -> CsvResult<Vec<T>> {
        self.read_from(data.as_bytes(), "<string>")
    }
}
