use super::csv_io::{CsvError, CsvReader};
use crate::config::DataConfig;
use crate::storage::repository::{EntryRepository, HeiRepository};
use crate::storage::StorageError;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// 資料匯入錯誤
#[derive(Error, Debug)]
pub enum SeedError {
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("寫入資料庫失敗: {0}")]
    Storage(#[from] StorageError),
}

/// 單一資料表的匯入結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSeed {
    /// 已寫入的筆數
    Inserted(usize),
    /// 資料表已有資料
    AlreadyPopulated,
    /// CSV 檔案不存在
    MissingFile,
}

/// 匯入結果摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub heis: TableSeed,
    pub entries: TableSeed,
}

/// 從 CSV 檔案載入初始資料
///
/// 只寫入空的資料表；每張表在單一事務中分批寫入，失敗時整張表回滾。
pub struct DataLoader {
    heis: Arc<dyn HeiRepository>,
    entries: Arc<dyn EntryRepository>,
    config: DataConfig,
    reader: CsvReader,
}

impl DataLoader {
    pub fn new(
        heis: Arc<dyn HeiRepository>,
        entries: Arc<dyn EntryRepository>,
        config: DataConfig,
    ) -> Self {
        Self {
            heis,
            entries,
            config,
            reader: CsvReader::default(),
        }
    }

    /// 依序匯入 HEI 與條目
    pub async fn seed(&self) -> Result<SeedReport, SeedError> {
        let heis = self.seed_heis(&self.config.hei_path()).await?;
        let entries = self.seed_entries(&self.config.entry_path()).await?;

        let report = SeedReport { heis, entries };
        info!("資料匯入完成: {:?}", report);
        Ok(report)
    }

    /// 從指定檔案匯入 HEI
    pub async fn seed_heis(&self, path: &Path) -> Result<TableSeed, SeedError> {
        if self.heis.count().await? > 0 {
            info!("hei 資料表已有資料，略過匯入");
            return Ok(TableSeed::AlreadyPopulated);
        }

        let rows = match self.reader.read_heis(path) {
            Ok(rows) => rows,
            Err(CsvError::NotFound(path)) => {
                warn!("找不到 HEI 資料檔 {}，略過匯入", path.display());
                return Ok(TableSeed::MissingFile);
            }
            Err(e) => return Err(e.into()),
        };

        let inserted = self.heis.insert_batch(rows, self.config.batch_size).await?;
        info!("已從 {} 匯入 {} 筆 HEI", path.display(), inserted);
        Ok(TableSeed::Inserted(inserted))
    }

    /// 從指定檔案匯入條目
    pub async fn seed_entries(&self, path: &Path) -> Result<TableSeed, SeedError> {
        if self.entries.count().await? > 0 {
            info!("entry 資料表已有資料，略過匯入");
            return Ok(TableSeed::AlreadyPopulated);
        }

        let rows = match self.reader.read_entries(path) {
            Ok(rows) => rows,
            Err(CsvError::NotFound(path)) => {
                warn!("找不到條目資料檔 {}，略過匯入", path.display());
                return Ok(TableSeed::MissingFile);
            }
            Err(e) => return Err(e.into()),
        };

        let inserted = self
            .entries
            .insert_batch(rows, self.config.batch_size)
            .await?;
        info!("已從 {} 匯入 {} 筆條目", path.display(), inserted);
        Ok(TableSeed::Inserted(inserted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{create_test_pool, SqliteEntryRepository, SqliteHeiRepository};
    use std::fs;
    use tempfile::TempDir;

    fn write_data(dir: &TempDir) {
        fs::write(
            dir.path().join("hei_data.csv"),
            "UKPRN,he_name,region,lat,lon\n\
             10007788,The University of Cambridge,East of England,52.2043,0.1149\n\
             10007792,University of Exeter,South West,,\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("entry_data.csv"),
            "entry_id,academic_year,classification,category_marker,category,value,UKPRN,he_name\n\
             755,2021/22,Environmental information,Energy,Total energy,100,10007788,The University of Cambridge\n",
        )
        .unwrap();
    }

    async fn loader(dir: &TempDir) -> (DataLoader, Arc<SqliteHeiRepository>, Arc<SqliteEntryRepository>) {
        let pool = create_test_pool().await.unwrap();
        let heis = Arc::new(SqliteHeiRepository::new(pool.clone()));
        let entries = Arc::new(SqliteEntryRepository::new(pool));
        let config = DataConfig {
            directory: dir.path().display().to_string(),
            batch_size: 1,
            ..DataConfig::default()
        };
        (
            DataLoader::new(heis.clone(), entries.clone(), config),
            heis,
            entries,
        )
    }

    #[tokio::test]
    async fn test_seed_fills_empty_tables_once() {
        let dir = TempDir::new().unwrap();
        write_data(&dir);
        let (loader, heis, entries) = loader(&dir).await;

        let report = loader.seed().await.unwrap();
        assert_eq!(report.heis, TableSeed::Inserted(2));
        assert_eq!(report.entries, TableSeed::Inserted(1));

        let again = loader.seed().await.unwrap();
        assert_eq!(again.heis, TableSeed::AlreadyPopulated);
        assert_eq!(again.entries, TableSeed::AlreadyPopulated);

        assert_eq!(heis.count().await.unwrap(), 2);
        assert_eq!(entries.get(755).await.unwrap().unwrap().ukprn, Some(10007788));
    }

    #[tokio::test]
    async fn test_missing_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let (loader, _, _) = loader(&dir).await;

        let report = loader.seed().await.unwrap();
        assert_eq!(report.heis, TableSeed::MissingFile);
        assert_eq!(report.entries, TableSeed::MissingFile);
    }

    #[tokio::test]
    async fn test_malformed_file_fails_without_partial_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("hei_data.csv"),
            "UKPRN,he_name,region,lat,lon\n1,A,Wales,,\nbad,B,Wales,,\n",
        )
        .unwrap();
        let (loader, heis, _) = loader(&dir).await;

        assert!(matches!(loader.seed().await, Err(SeedError::Csv(CsvError::Row { line: 3, .. }))));
        assert_eq!(heis.count().await.unwrap(), 0);
    }
}
