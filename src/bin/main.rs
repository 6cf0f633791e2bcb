use anyhow::{Context, Result};
use clap::Parser;
use estates_server::config::{self, Environment};
use estates_server::logging::init_logging;
use estates_server::server::ServerBuilder;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "estates_server", version, about = "HEI 環境資料 REST API 伺服器")]
struct Cli {
    /// 監聽地址，覆寫 server.host
    #[arg(long)]
    host: Option<String>,

    /// 監聽端口，覆寫 server.port
    #[arg(long)]
    port: Option<u16>,

    /// 啟動時不從 CSV 匯入初始資料
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化配置
    let app_config = config::init_config().context("無法加載配置")?;

    // 初始化日誌系統，guard 需存活到程式結束
    let _log_guard = init_logging(&app_config.log, Environment::from_env())?;

    let mut app_config = app_config.clone();
    if let Some(host) = cli.host {
        app_config.server.host = host;
    }
    if let Some(port) = cli.port {
        app_config.server.port = port;
    }

    let mut builder = ServerBuilder::new().with_config(app_config.clone());
    if cli.no_seed {
        builder = builder.with_seed(false);
    }
    let server = builder.build().await.context("伺服器初始化失敗")?;

    info!(
        "伺服器初始化完成，監聽 {}:{}",
        app_config.server.host, app_config.server.port
    );

    server.run(shutdown_signal()).await?;
    Ok(())
}

// 等待關閉信號
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("接收到關閉信號，正在退出..."),
        Err(err) => error!("無法監聽關閉信號: {}", err),
    }
}
