use super::error::StoreError;
use crate::signal::entity::{NewSignal, Signal};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// # Summary
/// FIFO 配对命中时对被配对买入记录的单次 `pnl` 回填指令。
///
/// # Invariants
/// - 目标记录必须仍处于未配对状态 (event=buy 且 pnl IS NULL)，
///   否则整个原子追加单元必须失败。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PnlBackfill {
    /// 被配对买入记录的 id
    pub id: i64,
    /// 回填的已实现盈亏 (与卖出记录的 pnl 同值)
    pub pnl: Decimal,
}

/// # Summary
/// 信号事件存储端口：仅追加的有序日志，按 `id` 全序，
/// 支持插入序扫描与定向过滤查询。
///
/// # Invariants
/// - `id` 由实现者分配，在日志生命周期内严格递增且无空洞。
/// - 除整表清空与 `append` 携带的单次回填外，已写入记录不可变。
/// - 读取绝不改变任何记录。
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// # Summary
    /// 取 `id` 最大的一条记录。
    ///
    /// # Returns
    /// 空日志返回 `None`。
    async fn last_record(&self) -> Result<Option<Signal>, StoreError>;

    /// # Summary
    /// 按 `id` 升序返回全部记录，供均价策略做全量聚合。
    async fn all_records(&self) -> Result<Vec<Signal>, StoreError>;

    /// # Summary
    /// 按 `id` 升序返回指定标的的全部记录。
    ///
    /// # Arguments
    /// * `symbol` - 标的代码，区分大小写。
    async fn records_for_symbol(&self, symbol: &str) -> Result<Vec<Signal>, StoreError>;

    /// # Summary
    /// 取指定标的最早 (id 最小) 的未配对买入记录 (FIFO 队首)。
    ///
    /// # Logic
    /// 未配对 = event 为 buy 且 pnl IS NULL。
    ///
    /// # Arguments
    /// * `symbol` - 标的代码。
    ///
    /// # Returns
    /// 不存在未配对买入时返回 `None`。
    async fn earliest_unmatched_buy(&self, symbol: &str) -> Result<Option<Signal>, StoreError>;

    /// # Summary
    /// 追加一条新记录，并在同一个原子单元内执行可选的买入 `pnl` 回填。
    ///
    /// # Logic
    /// 1. 分配下一个 `id` 并写入新记录。
    /// 2. 若带回填，更新目标买入记录的 `pnl`；目标缺失或已配对则
    ///    整个单元回滚并返回 `NotFound`。
    /// 3. 两步要么同时可见，要么都不可见。
    ///
    /// # Arguments
    /// * `record` - 待落库记录。
    /// * `backfill` - FIFO 命中时的回填指令。
    ///
    /// # Returns
    /// 带已分配 `id` 的完整记录。
    async fn append(
        &self,
        record: NewSignal,
        backfill: Option<PnlBackfill>,
    ) -> Result<Signal, StoreError>;

    /// # Summary
    /// 整表清空。展示层管理动作的唯一删除入口。
    async fn delete_all(&self) -> Result<(), StoreError>;
}
