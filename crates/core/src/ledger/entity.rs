use crate::common::time::RawTimestamp;
use crate::signal::entity::EventKind;
use crate::store::port::PnlBackfill;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// # Summary
/// 报警平台经 HTTP 边界上送的一条原始交易事件。
/// 字段未经归一化：`event` 保留原始大小写，`time` 保留原始形态。
///
/// # Invariants
/// - 数值字段若存在必须为正，否则在校验阶段被拒绝。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub symbol: String,
    pub event: String,
    pub price: Decimal,
    pub lots: Option<Decimal>,
    pub lot_size: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub trade_value: Option<Decimal>,
    pub time: RawTimestamp,
}

/// # Summary
/// 校验并归一化后的交易事件，PnL 策略的唯一输入。
/// `event` 已解析为枚举，`time` 已格式化为本地展示字符串。
#[derive(Debug, Clone)]
pub struct IncomingEvent {
    pub symbol: String,
    pub event: EventKind,
    pub price: Decimal,
    pub lots: Option<Decimal>,
    pub lot_size: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub trade_value: Option<Decimal>,
    pub time: String,
}

/// # Summary
/// 一次 PnL 计算的全部派生结果。策略纯粹从存储快照推导，
/// 由调用方负责与新记录一起原子落库。
///
/// # Invariants
/// - `cumulative_pnl` = 上一条记录的累计值 (空日志为 0) + 本次 `pnl`
///   (卖出且非 None 时)，否则原样承接。
/// - `backfill` 仅在 FIFO 策略卖出命中时出现。
#[derive(Debug, Clone)]
pub struct Valuation {
    /// 历史买入总金额，含本次买入 (仅均价策略)
    pub total_purchase: Option<Decimal>,
    /// 净持仓，含本次事件 (仅均价策略)
    pub position: Option<Decimal>,
    /// 加权买入均价 (仅均价策略)
    pub avg_buy_price: Option<Decimal>,
    /// 本次已实现盈亏
    pub pnl: Option<Decimal>,
    /// 截至本条记录的累计已实现盈亏
    pub cumulative_pnl: Option<Decimal>,
    /// FIFO 命中时对被配对买入的回填指令
    pub backfill: Option<PnlBackfill>,
}
