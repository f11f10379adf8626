//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use soneki_core::common::time::RawTimestamp;
use soneki_core::ledger::entity::WebhookEvent;
use soneki_core::signal::entity::Signal;
use utoipa::ToSchema;

// ============================================================
//  Webhook 请求 DTO
// ============================================================

/// 报警平台推送的原始交易事件
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WebhookRequest {
    /// 标的代码 (区分大小写)
    #[schema(example = "AAPL")]
    pub symbol: String,
    /// 事件方向，"buy" 或 "sell"，大小写不限
    #[schema(example = "buy")]
    pub event: String,
    /// 成交价格
    #[schema(example = 175.5)]
    pub price: Decimal,
    /// 手数 (扩展字段)
    #[serde(default)]
    #[schema(example = 1.0)]
    pub lots: Option<Decimal>,
    /// 每手规模 (扩展字段)
    #[serde(default)]
    #[schema(example = 50.0)]
    pub lot_size: Option<Decimal>,
    /// 成交数量 (均价策略必填)
    #[serde(default)]
    #[schema(example = 50.0)]
    pub quantity: Option<Decimal>,
    /// 成交名义金额 (均价策略必填)
    #[serde(default)]
    #[schema(example = 8775.0)]
    pub trade_value: Option<Decimal>,
    /// 事件时间：UTC 毫秒整数或 `YYYY-MM-DDTHH:MM:SSZ` 字符串
    #[schema(value_type = String, example = "2024-06-01T10:00:00Z")]
    pub time: RawTimestamp,
}

impl From<WebhookRequest> for WebhookEvent {
    fn from(req: WebhookRequest) -> Self {
        WebhookEvent {
            symbol: req.symbol,
            event: req.event,
            price: req.price,
            lots: req.lots,
            lot_size: req.lot_size,
            quantity: req.quantity,
            trade_value: req.trade_value,
            time: req.time,
        }
    }
}

// ============================================================
//  信号记录 DTO
// ============================================================

/// 一条落库信号记录的 JSON 视图。金额字段以字符串输出保留精度。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignalResponse {
    /// 存储层分配的序号
    #[schema(example = 1)]
    pub id: i64,
    /// 标的代码
    #[schema(example = "AAPL")]
    pub symbol: String,
    /// 事件方向 ("buy"/"sell")
    #[schema(example = "buy")]
    pub event: String,
    /// 成交价格
    #[schema(example = "175.50")]
    pub price: String,
    /// 手数
    pub lots: Option<String>,
    /// 每手规模
    pub lot_size: Option<String>,
    /// 成交数量
    pub quantity: Option<String>,
    /// 成交名义金额
    pub trade_value: Option<String>,
    /// 历史买入总金额 (仅均价策略)
    pub total_purchase: Option<String>,
    /// 净持仓 (仅均价策略)
    pub position: Option<String>,
    /// 加权买入均价 (仅均价策略)
    pub avg_buy_price: Option<String>,
    /// 本地时区展示时间
    #[schema(example = "01-06-2024 15:30:00")]
    pub time: String,
    /// 已实现盈亏
    pub pnl: Option<String>,
    /// 累计已实现盈亏
    pub cumulative_pnl: Option<String>,
}

impl From<&Signal> for SignalResponse {
    fn from(signal: &Signal) -> Self {
        Self {
            id: signal.id,
            symbol: signal.symbol.clone(),
            event: signal.event.to_string(),
            price: signal.price.to_string(),
            lots: fmt_opt(signal.lots),
            lot_size: fmt_opt(signal.lot_size),
            quantity: fmt_opt(signal.quantity),
            trade_value: fmt_opt(signal.trade_value),
            total_purchase: fmt_opt(signal.total_purchase),
            position: fmt_opt(signal.position),
            avg_buy_price: fmt_opt(signal.avg_buy_price),
            time: signal.time.clone(),
            pnl: fmt_opt(signal.pnl),
            cumulative_pnl: fmt_opt(signal.cumulative_pnl),
        }
    }
}

fn fmt_opt(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

/// Webhook 成功响应：`status: "success"` 加完整落库记录的平铺回显
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WebhookResponse {
    /// 固定为 "success"
    #[schema(example = "success")]
    pub status: String,
    #[serde(flatten)]
    pub signal: SignalResponse,
}

impl From<&Signal> for WebhookResponse {
    fn from(signal: &Signal) -> Self {
        Self {
            status: "success".to_string(),
            signal: SignalResponse::from(signal),
        }
    }
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 失败响应：`{"status":"error","message":...}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 "error"
    #[schema(example = "error")]
    pub status: String,
    /// 错误描述信息
    pub message: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: msg.into(),
        }
    }
}
