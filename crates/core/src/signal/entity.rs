use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 交易事件方向枚举。来自报警平台的原始字符串在摄入阶段统一转小写解析。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// 买入
    Buy,
    /// 卖出
    Sell,
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(EventKind::Buy),
            "sell" => Ok(EventKind::Sell),
            _ => Err(format!("Unknown event kind: {}", s)),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Buy => write!(f, "buy"),
            EventKind::Sell => write!(f, "sell"),
        }
    }
}

/// # Summary
/// 一条已落库的信号记录。每次摄入恰好产生一条，落库后不可变，
/// 唯一例外是 FIFO 模式下被后续卖出配对的买入记录的单次 `pnl` 回填。
///
/// # Invariants
/// - `id` 由存储层分配，严格单调递增，是唯一的排序键。
/// - `time` 仅供展示，绝不参与排序或比较。
/// - `pnl` 至多被赋值一次；买入记录的回填即其唯一一次赋值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// 存储层分配的序号
    pub id: i64,
    /// 标的代码 (区分大小写)
    pub symbol: String,
    /// 买卖方向
    pub event: EventKind,
    /// 成交价格
    pub price: Decimal,
    /// 手数 (扩展字段，简化部署可缺省)
    pub lots: Option<Decimal>,
    /// 每手规模
    pub lot_size: Option<Decimal>,
    /// 成交数量
    pub quantity: Option<Decimal>,
    /// 成交名义金额
    pub trade_value: Option<Decimal>,
    /// 历史买入总金额 (仅均价策略)
    pub total_purchase: Option<Decimal>,
    /// 净持仓 (仅均价策略)
    pub position: Option<Decimal>,
    /// 加权买入均价 (仅均价策略)
    pub avg_buy_price: Option<Decimal>,
    /// 本地时区展示时间字符串
    pub time: String,
    /// 已实现盈亏；买入恒为 None，FIFO 未配对卖出亦为 None
    pub pnl: Option<Decimal>,
    /// 截至本条记录的累计已实现盈亏
    pub cumulative_pnl: Option<Decimal>,
}

/// # Summary
/// 待落库的信号记录，即 `Signal` 去掉存储层分配的 `id`。
#[derive(Debug, Clone)]
pub struct NewSignal {
    pub symbol: String,
    pub event: EventKind,
    pub price: Decimal,
    pub lots: Option<Decimal>,
    pub lot_size: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub trade_value: Option<Decimal>,
    pub total_purchase: Option<Decimal>,
    pub position: Option<Decimal>,
    pub avg_buy_price: Option<Decimal>,
    pub time: String,
    pub pnl: Option<Decimal>,
    pub cumulative_pnl: Option<Decimal>,
}
