//! # 信号账本 JSON 路由控制器
//!
//! 实现 `/api/v1/signals` 路径下的 REST 接口：
//! 按 id 升序的只读列表，以及整表清空管理动作。

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiResponse, SignalResponse};

/// 按 id 升序列出全部信号记录
///
/// 只读操作，绝不改变任何记录。
#[utoipa::path(
    get,
    path = "/api/v1/signals",
    tag = "信号账本 (Signals)",
    responses(
        (status = 200, description = "成功获取信号列表", body = ApiResponse<Vec<SignalResponse>>),
        (status = 500, description = "存储读取失败")
    )
)]
pub async fn list_signals(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SignalResponse>>>, ApiError> {
    let records = state.store.all_records().await?;
    let rows: Vec<SignalResponse> = records.iter().map(SignalResponse::from).collect();
    Ok(Json(ApiResponse::ok(rows)))
}

/// 清空全部信号记录
///
/// 展示层管理动作的唯一删除入口，单条记录不可删除。
#[utoipa::path(
    delete,
    path = "/api/v1/signals",
    tag = "信号账本 (Signals)",
    responses(
        (status = 200, description = "已清空", body = ApiResponse<String>),
        (status = 500, description = "存储写入失败")
    )
)]
pub async fn wipe_signals(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state.store.delete_all().await?;
    tracing::warn!("⚠️ All signal records deleted");
    Ok(Json(ApiResponse::ok("ok".to_string())))
}
