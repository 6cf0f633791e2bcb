use serde::{Serialize, Deserialize};
use crate::config::validation::{ValidationError, ValidationUtils, Validator};

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub server: ServerConfig,
    pub rest_api: RestApiConfig,
    pub data: DataConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.database.validate()?;
        self.log.validate()?;
        self.server.validate()?;
        self.rest_api.validate()?;
        self.data.validate()?;

        Ok(())
    }
}

/// 數據庫配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite 連接字串，例如 `sqlite://instance/hei_environmental.sqlite` 或 `sqlite::memory:`
    pub url: String,
    pub create_if_missing: bool,
    /// 是否強制外鍵約束（SQLite 預設不強制）
    pub foreign_keys: bool,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://instance/hei_environmental.sqlite".to_string(),
            create_if_missing: true,
            foreign_keys: false,
            max_connections: 5,
            min_connections: 1,
            max_lifetime_secs: 1800,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 600,
        }
    }
}

impl Validator for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證數據庫配置
        ValidationUtils::not_empty(&self.url, "database.url")?;
        ValidationUtils::has_prefix(&self.url, "sqlite:", "database.url")?;
        ValidationUtils::in_range(self.min_connections, 0, 100, "database.min_connections")?;
        ValidationUtils::in_range(self.max_connections, self.min_connections.max(1), 100, "database.max_connections")?;

        Ok(())
    }
}

impl DatabaseConfig {
    /// 以記憶體資料庫建立配置，主要用於測試
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    /// 是否為記憶體資料庫
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// 獲取最大生命週期持續時間
    pub fn max_lifetime(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.max_lifetime_secs)
    }

    /// 獲取獲取連接超時持續時間
    pub fn acquire_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 獲取閒置超時持續時間
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_timeout_secs)
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
    /// 日誌檔案目錄，空字串表示不寫入檔案
    pub directory: String,
    pub file_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: "logs".to_string(),
            file_name: "estates.log".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"].iter().map(|s| s.to_string()).collect::<Vec<String>>(),
            "log.level"
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"].iter().map(|s| s.to_string()).collect::<Vec<String>>(),
            "log.format"
        )?;

        ValidationUtils::check_dependency(
            !self.directory.trim().is_empty(),
            !self.file_name.trim().is_empty(),
            "log.directory",
            "log.file_name",
        )?;

        Ok(())
    }
}

/// 伺服器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: u64,
    pub enable_compression: bool,
    pub enable_cors: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout: 30,
            enable_compression: true,
            enable_cors: false,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Validator for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證服務器配置
        ValidationUtils::not_empty(&self.host, "server.host")?;
        ValidationUtils::in_range(self.port, 1, 65535, "server.port")?;
        ValidationUtils::in_range(self.request_timeout, 1, 3600, "server.request_timeout")?;

        // CORS設定驗證
        if self.enable_cors && self.cors_allowed_origins.is_empty() {
            return Err(ValidationError::InvalidValue(
                "啟用CORS但未指定允許的來源".to_string()
            ));
        }

        Ok(())
    }
}

/// REST API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestApiConfig {
    /// 路由前綴，空字串或 `/` 表示掛在根路徑
    pub base_path: String,
    pub default_per_page: i64,
    pub max_per_page: i64,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            default_per_page: 10,
            max_per_page: 1000,
        }
    }
}

impl Validator for RestApiConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證API配置
        if !self.base_path.is_empty() {
            ValidationUtils::has_prefix(&self.base_path, "/", "rest_api.base_path")?;
        }
        ValidationUtils::in_range(self.max_per_page, 1, 100_000, "rest_api.max_per_page")?;
        ValidationUtils::in_range(self.default_per_page, 1, self.max_per_page, "rest_api.default_per_page")?;

        Ok(())
    }
}

/// CSV 數據來源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub directory: String,
    pub hei_file: String,
    pub entry_file: String,
    /// 啟動時若資料表為空則從 CSV 匯入
    pub seed_on_startup: bool,
    pub batch_size: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: "data".to_string(),
            hei_file: "hei_data.csv".to_string(),
            entry_file: "entry_data.csv".to_string(),
            seed_on_startup: true,
            batch_size: 500,
        }
    }
}

impl DataConfig {
    pub fn hei_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.directory).join(&self.hei_file)
    }

    pub fn entry_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.directory).join(&self.entry_file)
    }
}

impl Validator for DataConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.seed_on_startup {
            ValidationUtils::not_empty(&self.directory, "data.directory")?;
            ValidationUtils::not_empty(&self.hei_file, "data.hei_file")?;
            ValidationUtils::not_empty(&self.entry_file, "data.entry_file")?;
        }
        ValidationUtils::in_range(self.batch_size, 1, 4_000, "data.batch_size")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ApplicationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_in_memory_database() {
        let db = DatabaseConfig::in_memory();
        assert!(db.is_in_memory());
        assert!(!DatabaseConfig::default().is_in_memory());
    }

    #[test]
    fn test_data_batch_size_bounds() {
        let data = DataConfig {
            batch_size: 4_000,
            ..DataConfig::default()
        };
        assert!(data.validate().is_ok());

        let data = DataConfig {
            batch_size: 10_000,
            ..DataConfig::default()
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_cors_requires_origins() {
        let server = ServerConfig {
            enable_cors: true,
            ..ServerConfig::default()
        };
        assert!(server.validate().is_err());
    }

    #[test]
    fn test_rest_api_paging_bounds() {
        let api = RestApiConfig {
            default_per_page: 50,
            max_per_page: 20,
            ..RestApiConfig::default()
        };
        assert!(api.validate().is_err());

        let api = RestApiConfig {
            base_path: "api".to_string(),
            ..RestApiConfig::default()
        };
        assert!(api.validate().is_err());
    }

    #[test]
    fn test_data_paths() {
        let data = DataConfig::default();
        assert_eq!(data.hei_path(), std::path::Path::new("data").join("hei_data.csv"));
        assert_eq!(data.entry_path(), std::path::Path::new("data").join("entry_data.csv"));
    }
}
