use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use estates_server::config::{self, Environment};
use estates_server::data_ingestion::DataLoader;
use estates_server::logging::init_logging;
use estates_server::storage::{self, SqliteEntryRepository, SqliteHeiRepository};
use tracing::info;

#[derive(Parser)]
#[command(name = "migrate", about = "estates_server 數據庫遷移工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 運行所有未應用的遷移
    Run,

    /// 從 CSV 匯入初始資料（只寫入空的資料表）
    Seed,

    /// 檢查遷移狀態
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行參數
    let cli = Cli::parse();

    let app_config = config::init_config().context("無法加載配置")?;
    let _log_guard = init_logging(&app_config.log, Environment::from_env())?;

    let pool = storage::init_db_pool(&app_config.database)
        .await
        .context("無法初始化資料庫連接池")?;

    // 執行命令
    match cli.command {
        Commands::Run => {
            info!("開始運行資料庫遷移...");
            storage::run_migrations(&pool)
                .await
                .context("資料庫遷移執行失敗")?;
            info!("資料庫遷移完成！");
        }
        Commands::Seed => {
            storage::run_migrations(&pool)
                .await
                .context("資料庫遷移執行失敗")?;

            let loader = DataLoader::new(
                Arc::new(SqliteHeiRepository::new(pool.clone())),
                Arc::new(SqliteEntryRepository::new(pool.clone())),
                app_config.data.clone(),
            );
            let report = loader.seed().await.context("資料匯入失敗")?;
            println!("hei: {:?}", report.heis);
            println!("entry: {:?}", report.entries);
        }
        Commands::Status => {
            let applied = storage::applied_migrations(&pool)
                .await
                .context("無法查詢遷移狀態")?;

            println!(
                "已套用 {}/{} 個遷移",
                applied.len(),
                storage::embedded_migration_count()
            );
            for migration in applied {
                let mark = if migration.success { "ok" } else { "FAILED" };
                println!(
                    "  {} {} [{}] {}",
                    migration.version,
                    migration.description,
                    mark,
                    migration.installed_on.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }

    pool.close().await;
    Ok(())
}
