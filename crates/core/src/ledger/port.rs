use super::entity::{IncomingEvent, Valuation, WebhookEvent};
use super::error::LedgerError;
use crate::signal::entity::Signal;
use crate::store::port::SignalStore;
use async_trait::async_trait;

/// # Summary
/// PnL 计算策略端口。给定事件存储的当前内容与一条归一化事件，
/// 纯粹推导全部待落库派生字段，自身不产生任何副作用。
///
/// # Invariants
/// - 实现者只读存储，落库由调用方完成。
/// - 累计值必须从传入的存储快照显式读出，禁止任何进程级共享状态。
#[async_trait]
pub trait PnlStrategy: Send + Sync {
    /// # Summary
    /// 对一条归一化事件执行 PnL 推导。
    ///
    /// # Arguments
    /// * `store` - 事件存储的只读访问。
    /// * `event` - 校验归一化后的事件。
    ///
    /// # Returns
    /// * `Ok(Valuation)` - 全部派生字段与可选回填指令
    /// * `Err(LedgerError)` - 策略所需字段缺失或存储读取失败
    async fn evaluate(
        &self,
        store: &dyn SignalStore,
        event: &IncomingEvent,
    ) -> Result<Valuation, LedgerError>;
}

/// # Summary
/// 信号摄入端口。HTTP 边界经此端口提交原始事件，
/// 实现者负责校验、归一化、调用策略并原子落库。
///
/// # Invariants
/// - "读快照 → 计算 → 写入" 序列相对其它摄入调用串行执行。
/// - 任何失败都不得留下部分写入的记录。
#[async_trait]
pub trait IngestPort: Send + Sync {
    /// # Summary
    /// 摄入一条原始事件并返回完整落库记录。
    ///
    /// # Arguments
    /// * `event` - 边界解码后的原始事件。
    ///
    /// # Returns
    /// * `Ok(Signal)` - 带 id 与全部派生字段的落库记录
    /// * `Err(LedgerError)` - 校验失败或持久化失败，均未落库
    async fn ingest(&self, event: WebhookEvent) -> Result<Signal, LedgerError>;
}
