use async_trait::async_trait;
use soneki_core::signal::entity::{EventKind, NewSignal, Signal};
use soneki_core::store::error::StoreError;
use soneki_core::store::port::{PnlBackfill, SignalStore};
use tokio::sync::RwLock;

/// # Summary
/// 基于内存的 `SignalStore` 适配器，供测试与本地开发使用。
/// 记录按插入序保存在 `Vec` 中，下标即 `id - 1`。
///
/// # Invariants
/// - 仅追加加整表清空的使用模式下，`id = len + 1` 分配与
///   SQLite 行号语义一致：严格递增无空洞，清空后从 1 重新计数。
pub struct MemorySignalStore {
    records: RwLock<Vec<Signal>>,
}

impl MemorySignalStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemorySignalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalStore for MemorySignalStore {
    async fn last_record(&self) -> Result<Option<Signal>, StoreError> {
        Ok(self.records.read().await.last().cloned())
    }

    async fn all_records(&self) -> Result<Vec<Signal>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn records_for_symbol(&self, symbol: &str) -> Result<Vec<Signal>, StoreError> {
        let guard = self.records.read().await;
        Ok(guard.iter().filter(|s| s.symbol == symbol).cloned().collect())
    }

    async fn earliest_unmatched_buy(&self, symbol: &str) -> Result<Option<Signal>, StoreError> {
        let guard = self.records.read().await;
        Ok(guard
            .iter()
            .find(|s| s.symbol == symbol && s.event == EventKind::Buy && s.pnl.is_none())
            .cloned())
    }

    /// # Logic
    /// 回填先于追加校验：目标缺失或已配对时整个单元失败，
    /// 与 SQLite 适配器的事务回滚语义对齐。
    async fn append(
        &self,
        record: NewSignal,
        backfill: Option<PnlBackfill>,
    ) -> Result<Signal, StoreError> {
        let mut guard = self.records.write().await;

        if let Some(fill) = backfill {
            let target = guard
                .iter_mut()
                .find(|s| s.id == fill.id && s.event == EventKind::Buy && s.pnl.is_none())
                .ok_or(StoreError::NotFound)?;
            target.pnl = Some(fill.pnl);
        }

        let id = i64::try_from(guard.len()).map_err(|e| StoreError::Unknown(e.to_string()))? + 1;
        let signal = Signal {
            id,
            symbol: record.symbol,
            event: record.event,
            price: record.price,
            lots: record.lots,
            lot_size: record.lot_size,
            quantity: record.quantity,
            trade_value: record.trade_value,
            total_purchase: record.total_purchase,
            position: record.position,
            avg_buy_price: record.avg_buy_price,
            time: record.time,
            pnl: record.pnl,
            cumulative_pnl: record.cumulative_pnl,
        };
        guard.push(signal.clone());
        Ok(signal)
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.records.write().await.clear();
        Ok(())
    }
}
