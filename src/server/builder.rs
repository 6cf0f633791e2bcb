use std::future::Future;
use std::sync::Arc;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{AppState, RestApi};
use crate::config::ApplicationConfig;
use crate::data_ingestion::DataLoader;
use crate::storage::{database, migrations};
use crate::server::{ServerError, ServerResult, ServerState};

/// 伺服器實例
pub struct Server {
    /// 伺服器狀態
    state: Arc<RwLock<ServerState>>,
    /// 資料庫連接池
    pool: SqlitePool,
    /// 路由共享狀態
    app_state: AppState,
    rest_api: RestApi,
}

impl Server {
    /// 綁定配置中的地址並運行，直到 `shutdown` 完成
    pub async fn run<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.rest_api.address()).await?;
        self.run_with_listener(listener, shutdown).await
    }

    /// 在既有的監聽器上運行
    pub async fn run_with_listener<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Server {
            state,
            pool,
            app_state,
            rest_api,
        } = self;

        *state.write().await = ServerState::Running;
        info!("伺服器已啟動");

        let shutdown_state = state.clone();
        let graceful = async move {
            shutdown.await;
            *shutdown_state.write().await = ServerState::ShuttingDown;
            info!("接收到關閉信號，等待進行中的請求完成...");
        };

        let result = rest_api.serve(listener, app_state, graceful).await;

        pool.close().await;
        *state.write().await = ServerState::Stopped;
        info!("伺服器已關閉");

        result.map_err(|e| ServerError::Runtime(format!("HTTP 服務異常結束: {}", e)))
    }

    /// 獲取伺服器狀態
    pub async fn state(&self) -> ServerState {
        *self.state.read().await
    }

    /// 路由共享狀態
    pub fn app_state(&self) -> AppState {
        self.app_state.clone()
    }
}

/// 伺服器構建器
pub struct ServerBuilder {
    config: Option<ApplicationConfig>,
    pool: Option<SqlitePool>,
    seed: Option<bool>,
}

impl ServerBuilder {
    /// 創建新的伺服器構建器
    pub fn new() -> Self {
        Self {
            config: None,
            pool: None,
            seed: None,
        }
    }

    /// 設置應用配置
    pub fn with_config(mut self, config: ApplicationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 使用既有的連接池，不再依配置建立
    pub fn with_pool(mut self, pool: SqlitePool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// 覆寫 `data.seed_on_startup`
    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 連接資料庫、執行遷移與初始匯入，返回伺服器實例
    pub async fn build(self) -> ServerResult<Server> {
        info!("構建伺服器實例");

        let config = self
            .config
            .ok_or_else(|| ServerError::Config("未提供應用配置".to_string()))?;

        let pool = match self.pool {
            Some(pool) => pool,
            None => database::init_db_pool(&config.database).await?,
        };

        migrations::run_migrations(&pool).await?;
        if !database::health_check(&pool).await {
            return Err(ServerError::Runtime("資料庫健康檢查失敗".to_string()));
        }

        let app_state = AppState::from_pool(pool.clone(), config.rest_api.clone());

        if self.seed.unwrap_or(config.data.seed_on_startup) {
            let loader = DataLoader::new(
                app_state.heis.clone(),
                app_state.entries.clone(),
                config.data.clone(),
            );
            let report = loader.seed().await?;
            debug!("初始資料匯入結果: {:?}", report);
        } else {
            warn!("已停用啟動時的資料匯入");
        }

        let server = Server {
            state: Arc::new(RwLock::new(ServerState::Initializing)),
            pool,
            app_state,
            rest_api: RestApi::new(config.server.clone(), config.rest_api.clone()),
        };

        info!("伺服器實例構建完成");

        Ok(server)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
