//! # Webhook 摄入路由控制器
//!
//! 实现 `/webhook` 端点：报警平台的交易事件由此进入系统。
//! 任何失败 (缺字段、坏类型、时间不可解析、引擎校验失败) 都以
//! `{"status":"error","message":...}` 弹回，且不落库任何部分记录。

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, WebhookRequest, WebhookResponse};

/// 摄入一条交易事件
///
/// 校验归一化后经选定的 PnL 策略计算派生字段并原子落库。
/// 成功时平铺回显输入字段与全部计算字段。
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "信号接入 (Webhook)",
    request_body = WebhookRequest,
    responses(
        (status = 200, description = "事件已落库", body = WebhookResponse),
        (status = 400, description = "输入校验失败", body = ApiErrorResponse),
        (status = 500, description = "持久化失败", body = ApiErrorResponse)
    )
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> Result<Json<WebhookResponse>, ApiError> {
    // 请求体解码失败 (缺字段/坏类型) 也走统一错误形状
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let signal = state.ingest.ingest(request.into()).await?;

    Ok(Json(WebhookResponse::from(&signal)))
}
