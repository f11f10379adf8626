//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use soneki_core::ledger::port::IngestPort;
use soneki_core::store::port::SignalStore;

use crate::routes::{pages, signals, webhook};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `ingest` 与 `store` 在服务启动前由 DI 容器注入，生命周期与进程等同。
/// - 写路径只走 `ingest`；`store` 仅供只读列表与整表清空。
#[derive(Clone)]
pub struct AppState {
    /// 信号摄入端口 (唯一写入路径)
    pub ingest: Arc<dyn IngestPort>,
    /// 事件存储只读访问与清空入口
    pub store: Arc<dyn SignalStore>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Soneki 信号账本 API",
        version = "0.1.0",
        description = "接收 TradingView webhook 交易事件，计算已实现与累计盈亏，并提供账本查询。",
        license(name = "MIT")
    ),
    tags(
        (name = "信号接入 (Webhook)", description = "报警平台事件摄入"),
        (name = "信号账本 (Signals)", description = "账本列表查询与整表清空")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. OpenAPI 路由组：webhook 摄入 + JSON 账本接口。
/// 2. 浏览器页面组：首页、HTML 表格与清空按钮 (不进 Swagger)。
/// 3. 挂载 Swagger UI 并套 CORS (开发阶段允许所有来源)。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(webhook::receive_webhook))
        .routes(routes!(signals::list_signals, signals::wipe_signals))
        .with_state(state.clone())
        .split_for_parts();

    let page_router = Router::new()
        .route("/", get(pages::home))
        .route("/signals", get(pages::signals_page).post(pages::wipe_and_redirect))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(page_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 绑定 TCP 端口并启动 HTTP 监听，直至收到退出信号。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:5000"`
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    tracing::info!("🚀 Soneki API Server listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received. Exiting...");
        })
        .await?;

    Ok(())
}
