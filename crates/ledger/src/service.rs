use async_trait::async_trait;
use rust_decimal::Decimal;
use soneki_core::common::time::to_display_time;
use soneki_core::ledger::entity::{IncomingEvent, WebhookEvent};
use soneki_core::ledger::error::LedgerError;
use soneki_core::ledger::port::{IngestPort, PnlStrategy};
use soneki_core::signal::entity::{EventKind, NewSignal, Signal};
use soneki_core::store::port::SignalStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// # Summary
/// 信号摄入服务，系统唯一的写入路径。
/// 持有事件存储与选定的 PnL 策略，对外实现 `IngestPort`。
///
/// # Invariants
/// - `write_gate` 串行化整个"读快照 → 计算 → 原子落库"序列：
///   没有它，两条并发卖出会读到同一个过期累计值，或配对同一条
///   未配对买入，破坏账本不变量。
/// - 校验失败在拿锁之前发生，不产生任何写入。
pub struct IngestService {
    store: Arc<dyn SignalStore>,
    strategy: Arc<dyn PnlStrategy>,
    write_gate: Mutex<()>,
}

impl IngestService {
    pub fn new(store: Arc<dyn SignalStore>, strategy: Arc<dyn PnlStrategy>) -> Self {
        Self {
            store,
            strategy,
            write_gate: Mutex::new(()),
        }
    }
}

/// 校验并归一化一条原始事件。
///
/// # Logic
/// 1. `symbol` 非空。
/// 2. `event` 大小写不敏感解析为 buy/sell。
/// 3. `price` 与所有提供的可选数值必须为正。
/// 4. `time` 归一化为本地展示字符串。
fn normalize(event: WebhookEvent) -> Result<IncomingEvent, LedgerError> {
    if event.symbol.trim().is_empty() {
        return Err(LedgerError::Validation("Missing field `symbol`".into()));
    }

    let kind = event
        .event
        .parse::<EventKind>()
        .map_err(LedgerError::Validation)?;

    require_positive("price", Some(event.price))?;
    require_positive("lots", event.lots)?;
    require_positive("lot_size", event.lot_size)?;
    require_positive("quantity", event.quantity)?;
    require_positive("trade_value", event.trade_value)?;

    let time = to_display_time(&event.time)?;

    Ok(IncomingEvent {
        symbol: event.symbol,
        event: kind,
        price: event.price,
        lots: event.lots,
        lot_size: event.lot_size,
        quantity: event.quantity,
        trade_value: event.trade_value,
        time,
    })
}

fn require_positive(field: &str, value: Option<Decimal>) -> Result<(), LedgerError> {
    match value {
        Some(v) if v <= Decimal::ZERO => Err(LedgerError::Validation(format!(
            "Field `{}` must be positive, got {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

#[async_trait]
impl IngestPort for IngestService {
    /// # Logic
    /// 1. 锁外校验归一化，坏事件直接弹回。
    /// 2. 进入写闸，策略基于存储当前快照推导派生字段。
    /// 3. 新记录与可选回填指令交给存储原子落库。
    async fn ingest(&self, event: WebhookEvent) -> Result<Signal, LedgerError> {
        let incoming = normalize(event)?;

        let _guard = self.write_gate.lock().await;

        let valuation = self
            .strategy
            .evaluate(self.store.as_ref(), &incoming)
            .await?;

        let record = NewSignal {
            symbol: incoming.symbol,
            event: incoming.event,
            price: incoming.price,
            lots: incoming.lots,
            lot_size: incoming.lot_size,
            quantity: incoming.quantity,
            trade_value: incoming.trade_value,
            total_purchase: valuation.total_purchase,
            position: valuation.position,
            avg_buy_price: valuation.avg_buy_price,
            time: incoming.time,
            pnl: valuation.pnl,
            cumulative_pnl: valuation.cumulative_pnl,
        };

        let stored = self.store.append(record, valuation.backfill).await?;

        info!(
            "✅ {} | {} @ {} | PnL: {} | Cum PnL: {}",
            stored.event,
            stored.symbol,
            stored.price,
            stored
                .pnl
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
            stored
                .cumulative_pnl
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
        );

        Ok(stored)
    }
}
