//! # `soneki-ledger` - PnL 记账引擎
//!
//! 本 crate 承载系统的核心不变量：买卖事件的盈亏实现规则。
//! 两种可互换策略实现 `PnlStrategy` 端口：
//! - [`average::AverageCostStrategy`]: 卖出按全量买入加权均价实现盈亏
//! - [`fifo::FifoMatchStrategy`]: 卖出与最早未配对买入严格一对一配对
//!
//! [`service::IngestService`] 是唯一的写入路径：校验、归一化、
//! 在全局写闸内执行"读快照 → 计算 → 原子落库"。

pub mod average;
pub mod fifo;
pub mod service;
