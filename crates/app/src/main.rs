use std::path::PathBuf;
use std::sync::Arc;

use soneki_api::server::{AppState, start_server};
use soneki_core::config::{AppConfig, EngineStrategy};
use soneki_core::ledger::port::{IngestPort, PnlStrategy};
use soneki_core::store::port::SignalStore;
use soneki_ledger::average::AverageCostStrategy;
use soneki_ledger::fifo::FifoMatchStrategy;
use soneki_ledger::service::IngestService;
use soneki_store::config::set_data_root;
use soneki_store::signal::SqliteSignalStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 HTTP 层。
///
/// # Logic
/// 1. 初始化全局日志。
/// 2. 读取配置并落定数据根目录。
/// 3. 实例化基础设施层 (SQLite 事件存储)。
/// 4. 按配置选定 PnL 策略，构造摄入服务。
/// 5. 启动 HTTP 服务，阻塞至退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Soneki signal ledger starting...");

    // 2. 配置
    let config = AppConfig::from_env();
    set_data_root(PathBuf::from(&config.database.data_dir));

    // 3. 基础设施层
    let store: Arc<dyn SignalStore> = Arc::new(SqliteSignalStore::new().await?);

    // 4. PnL 策略与摄入服务
    let strategy: Arc<dyn PnlStrategy> = match config.engine.strategy {
        EngineStrategy::Average => Arc::new(AverageCostStrategy::new()),
        EngineStrategy::Fifo => Arc::new(FifoMatchStrategy::new()),
    };
    info!("PnL engine strategy: {}", config.engine.strategy);

    let ingest: Arc<dyn IngestPort> = Arc::new(IngestService::new(store.clone(), strategy));

    // 5. 启动 HTTP 服务
    let state = AppState { ingest, store };
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    start_server(state, &bind_addr).await
}
