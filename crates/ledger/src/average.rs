use async_trait::async_trait;
use rust_decimal::Decimal;
use soneki_core::ledger::entity::{IncomingEvent, Valuation};
use soneki_core::ledger::error::LedgerError;
use soneki_core::ledger::port::PnlStrategy;
use soneki_core::signal::entity::EventKind;
use soneki_core::store::port::SignalStore;

/// # Summary
/// 加权均价策略：每次卖出按全部历史买入的加权均价实现盈亏。
///
/// 聚合范围是整个日志，不按标的隔离——沿用既有部署的观测行为，
/// 多标的场景下这是一个已知局限 (见 DESIGN.md)。
///
/// # Invariants
/// - `avg_buy_price` 仅由买入事件改变，卖出永不影响均价。
/// - 卖出的 pnl 以"不含本次卖出"的均价计算。
/// - 买入数量合计为 0 时均价定义为 0，不是错误。
pub struct AverageCostStrategy;

impl AverageCostStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AverageCostStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PnlStrategy for AverageCostStrategy {
    /// # Logic
    /// 1. 校验本策略必需的 `quantity` / `trade_value` 存在。
    /// 2. 全量扫描日志，聚合买入金额、买入/卖出数量与买入成本。
    /// 3. 买入事件把自身并入聚合后再计算均价；卖出事件不并入。
    /// 4. pnl = (卖价 − 均价) × 数量；累计值承接上一条记录。
    async fn evaluate(
        &self,
        store: &dyn SignalStore,
        event: &IncomingEvent,
    ) -> Result<Valuation, LedgerError> {
        let quantity = event.quantity.ok_or_else(|| {
            LedgerError::Validation("Missing field `quantity` for average-cost accounting".into())
        })?;
        let trade_value = event.trade_value.ok_or_else(|| {
            LedgerError::Validation("Missing field `trade_value` for average-cost accounting".into())
        })?;

        let history = store.all_records().await.map_err(LedgerError::Store)?;

        let mut total_purchase = Decimal::ZERO;
        let mut bought_qty = Decimal::ZERO;
        let mut sold_qty = Decimal::ZERO;
        let mut buy_cost = Decimal::ZERO;

        for signal in &history {
            let qty = signal.quantity.unwrap_or(Decimal::ZERO);
            match signal.event {
                EventKind::Buy => {
                    total_purchase += signal.trade_value.unwrap_or(Decimal::ZERO);
                    bought_qty += qty;
                    buy_cost += signal.price * qty;
                }
                EventKind::Sell => sold_qty += qty,
            }
        }

        let is_buy = event.event == EventKind::Buy;

        if is_buy {
            total_purchase += trade_value;
        }

        let mut position = bought_qty - sold_qty;
        position += if is_buy { quantity } else { -quantity };

        // 卖出不并入均价聚合：卖出的 pnl 按事前均价计算
        let (avg_qty, avg_cost) = if is_buy {
            (bought_qty + quantity, buy_cost + event.price * quantity)
        } else {
            (bought_qty, buy_cost)
        };
        let avg_buy_price = if avg_qty.is_zero() {
            Decimal::ZERO
        } else {
            avg_cost / avg_qty
        };

        let last_cumulative = store
            .last_record()
            .await
            .map_err(LedgerError::Store)?
            .and_then(|s| s.cumulative_pnl)
            .unwrap_or(Decimal::ZERO);

        let (pnl, cumulative_pnl) = if is_buy {
            (None, last_cumulative)
        } else {
            let realized = (event.price - avg_buy_price) * quantity;
            (Some(realized), last_cumulative + realized)
        };

        Ok(Valuation {
            total_purchase: Some(total_purchase),
            position: Some(position),
            avg_buy_price: Some(avg_buy_price),
            pnl,
            cumulative_pnl: Some(cumulative_pnl),
            backfill: None,
        })
    }
}
