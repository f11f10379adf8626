use async_trait::async_trait;
use rust_decimal::Decimal;
use soneki_core::ledger::entity::{IncomingEvent, Valuation};
use soneki_core::ledger::error::LedgerError;
use soneki_core::ledger::port::PnlStrategy;
use soneki_core::signal::entity::EventKind;
use soneki_core::store::port::{PnlBackfill, SignalStore};

/// # Summary
/// FIFO 配对策略：每次卖出与同标的最早未配对买入严格一对一配对，
/// pnl 即两者价差。
///
/// # Invariants
/// - 每条买入至多被配对一次；配对是终态，绝无解除或重排。
/// - 无可配对买入的卖出 pnl 为 None，且此后永不被追溯配对。
/// - 命中时被配对买入的 pnl 回填与卖出落库是同一个原子单元。
pub struct FifoMatchStrategy;

impl FifoMatchStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FifoMatchStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PnlStrategy for FifoMatchStrategy {
    /// # Logic
    /// 1. 读取上一条记录的累计值 (空日志为 0)。
    /// 2. 买入：pnl None，累计值原样承接。
    /// 3. 卖出：查同标的 FIFO 队首；命中则 pnl = 卖价 − 买价，
    ///    附带对该买入的回填指令；未命中则与买入同样承接。
    async fn evaluate(
        &self,
        store: &dyn SignalStore,
        event: &IncomingEvent,
    ) -> Result<Valuation, LedgerError> {
        let last_cumulative = store
            .last_record()
            .await
            .map_err(LedgerError::Store)?
            .and_then(|s| s.cumulative_pnl)
            .unwrap_or(Decimal::ZERO);

        let (pnl, cumulative_pnl, backfill) = match event.event {
            EventKind::Buy => (None, last_cumulative, None),
            EventKind::Sell => {
                match store
                    .earliest_unmatched_buy(&event.symbol)
                    .await
                    .map_err(LedgerError::Store)?
                {
                    Some(matched_buy) => {
                        let realized = event.price - matched_buy.price;
                        (
                            Some(realized),
                            last_cumulative + realized,
                            Some(PnlBackfill {
                                id: matched_buy.id,
                                pnl: realized,
                            }),
                        )
                    }
                    // 无可配对买入：pnl 置空，累计值不动
                    None => (None, last_cumulative, None),
                }
            }
        };

        Ok(Valuation {
            total_purchase: None,
            position: None,
            avg_buy_price: None,
            pnl,
            cumulative_pnl: Some(cumulative_pnl),
            backfill,
        })
    }
}
