//! # `soneki-core` - 领域核心
//!
//! 本 crate 定义 Soneki 信号账本的全部领域实体、端口抽象 (Port Trait)
//! 与错误类型，不包含任何 I/O 实现。
//!
//! ## 架构职责
//! - `signal`: 信号记录实体 (Signal) 与买卖事件枚举
//! - `store`: 事件存储端口 `SignalStore` 及其错误
//! - `ledger`: PnL 计算策略端口与摄入服务端口
//! - `common`: 时间戳归一化等跨域工具
//! - `config`: 全局应用配置

pub mod common;
pub mod config;
pub mod ledger;
pub mod signal;
pub mod store;
