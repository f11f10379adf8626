//! # `soneki-api` - HTTP 接入层
//!
//! 本 crate 是 Soneki 信号账本的 HTTP 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收报警平台 (TradingView) 推送的 `/webhook` 交易事件
//! - 经 `IngestPort` 完成校验、PnL 计算与原子落库
//! - 以 JSON (`/api/v1/signals`) 与 HTML 表格 (`/signals`) 两种方式展示账本
//! - 将领域错误映射为统一的 `{"status":"error","message":...}` 响应

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
