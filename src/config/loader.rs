use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use std::env;
use std::path::Path;

use crate::config::types::ApplicationConfig;

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    /// 從環境變數取得當前環境設定
    pub fn from_env() -> Self {
        Self::parse(&env::var("ESTATES_ENV").unwrap_or_else(|_| "development".into()))
    }

    /// 解析環境名稱，未知名稱視為開發環境
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "production" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Testing => "testing.toml",
            Environment::Production => "production.toml",
        }
    }

    pub fn is_testing(&self) -> bool {
        matches!(self, Environment::Testing)
    }
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 載入指定環境的配置
    pub fn load(env: Environment) -> Result<Config, ConfigError> {
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load_from_dir(&config_dir, env)
    }

    /// 從指定目錄載入配置
    ///
    /// 優先級由低到高：內建預設值、環境配置文件、`ESTATES__` 環境變數。
    pub fn load_from_dir<P: AsRef<Path>>(config_dir: P, env: Environment) -> Result<Config, ConfigError> {
        let config_path = config_dir.as_ref().join(env.as_filename());

        let mut config_builder = Config::builder();

        // 內建預設值，配置文件可以只覆寫需要的部分
        config_builder = config_builder.add_source(Config::try_from(&ApplicationConfig::default())?);

        // 加載環境特定配置（文件不存在時略過）
        config_builder = config_builder.add_source(File::from(config_path).required(false));

        // 從環境變數加載配置（優先級高於文件配置）
        config_builder = config_builder.add_source(
            ConfigEnvironment::with_prefix("ESTATES")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        // 構建最終配置
        config_builder.build()
    }
}
