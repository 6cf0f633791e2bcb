// logging.rs - 日誌系統初始化
//
// 同時輸出到終端與日誌檔案；測試環境預設使用 DEBUG 級別與獨立的日誌檔案。

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Environment, LogConfig};

/// 根據環境決定實際使用的日誌級別
pub fn effective_level(log_config: &LogConfig, env: Environment) -> String {
    if env.is_testing() {
        "debug".to_string()
    } else {
        log_config.level.to_lowercase()
    }
}

/// 建立過濾器，`RUST_LOG` 優先於配置
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "estates_server={level},tower_http={level},sqlx=warn,info"
        ))
    })
}

/// 初始化日誌系統
///
/// 返回的 [`WorkerGuard`] 必須保持存活，否則檔案日誌會遺失尾端的記錄。
pub fn init_logging(log_config: &LogConfig, env: Environment) -> Result<Option<WorkerGuard>> {
    let level = effective_level(log_config, env);
    let json = log_config.format.eq_ignore_ascii_case("json");

    // 檔案輸出（可選）
    let (file_writer, guard) = if log_config.directory.trim().is_empty() {
        (None, None)
    } else {
        std::fs::create_dir_all(&log_config.directory)
            .map_err(|e| anyhow!("無法創建日誌目錄 {}: {}", log_config.directory, e))?;
        let appender = tracing_appender::rolling::daily(&log_config.directory, &log_config.file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (Some(writer), Some(guard))
    };

    let console_pretty = (!json).then(|| fmt::layer().with_target(true));
    let console_json = json.then(|| fmt::layer().json().with_current_span(false));
    let file_layer = file_writer.map(|writer| fmt::layer().with_ansi(false).with_writer(writer));

    tracing_subscriber::registry()
        .with(build_filter(&level))
        .with(console_pretty)
        .with(console_json)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成，級別: {}", level);
    Ok(guard)
}
