//! # HTML 展示页面控制器
//!
//! 面向浏览器的只读展示层：首页、交易表页面与整表清空按钮。
//! 不在 Swagger 文档内，消费与 JSON 路由相同的存储读取接口。

use axum::extract::State;
use axum::response::{Html, Redirect};
use rust_decimal::Decimal;
use soneki_core::signal::entity::Signal;

use crate::error::ApiError;
use crate::server::AppState;

/// 首页：指引 webhook 地址与表格入口
pub async fn home() -> Html<&'static str> {
    Html(
        r#"<html>
    <head><title>Webhook Receiver</title></head>
    <body style="font-family: Arial; background-color: #f0f8ff; text-align: center; padding-top: 80px;">
    <h1>🚀 Soneki Webhook Receiver</h1>
    <p>Send TradingView webhook to <strong>/webhook</strong> endpoint.</p>
    <p>View stored signals table at <a href='/signals' target='_blank'>/signals</a>.</p>
    <p>API docs at <a href='/swagger-ui/' target='_blank'>/swagger-ui</a>.</p>
    </body>
    </html>"#,
    )
}

/// 交易表页面：按 id 升序渲染全部记录
pub async fn signals_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let records = state.store.all_records().await?;
    Ok(Html(render_table(&records)))
}

/// 整表清空后跳回表格页面
pub async fn wipe_and_redirect(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    state.store.delete_all().await?;
    tracing::warn!("⚠️ All signal records deleted");
    Ok(Redirect::to("/signals"))
}

const TABLE_HEAD: &str = r#"<html>
<head>
    <title>Trade Table with PnL</title>
    <style>
        body { font-family: Arial; background-color: #f9f9f9; padding: 20px; text-align: center; }
        table { border-collapse: collapse; width: 95%; margin: auto; }
        th, td { border: 1px solid #ccc; padding: 8px; text-align: center; font-size: 14px; }
        th { background-color: #f0f0f0; }
        h1 { text-align: center; }
        .delete-button { background-color: red; color: white; padding: 10px 20px; border: none; border-radius: 5px; cursor: pointer; margin: 20px; }
        .pnl-profit { color: green; font-weight: bold; }
        .pnl-loss { color: red; font-weight: bold; }
    </style>
</head>
<body>
    <h1>📊 Trading Table with Live PnL</h1>
    <form method="post" onsubmit="return confirm('Delete all records?');">
        <button type="submit" class="delete-button">🚨 Delete All</button>
    </form>
    <table>
        <tr>
            <th>ID</th><th>SYMBOL</th><th>EVENT</th><th>PRICE</th><th>LOTS</th><th>LOT SIZE</th>
            <th>QUANTITY</th><th>TRANSACTION</th><th>TOTAL PURCHASE</th><th>POSITION</th>
            <th>AVG BUY PRICE</th><th>TIME</th><th>PnL</th><th>CUMULATIVE PnL</th>
        </tr>"#;

const TABLE_TAIL: &str = "\n    </table>\n</body>\n</html>";

/// 将记录渲染为完整 HTML 表格。纯函数，便于单测。
fn render_table(records: &[Signal]) -> String {
    let mut html = String::from(TABLE_HEAD);
    for signal in records {
        html.push_str(&format!(
            "\n        <tr>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td>\
             <td>{}</td>\
             <td>{}</td>\
             </tr>",
            signal.id,
            escape(&signal.symbol),
            signal.event,
            signal.price,
            plain_cell(signal.lots),
            plain_cell(signal.lot_size),
            plain_cell(signal.quantity),
            plain_cell(signal.trade_value),
            plain_cell(signal.total_purchase),
            plain_cell(signal.position),
            rounded_cell(signal.avg_buy_price),
            escape(&signal.time),
            colored_pnl_cell(signal.pnl),
            colored_pnl_cell(signal.cumulative_pnl),
        ));
    }
    html.push_str(TABLE_TAIL);
    html
}

/// 缺省值渲染为空单元格
fn plain_cell(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

/// 金额保留两位小数展示
fn rounded_cell(value: Option<Decimal>) -> String {
    value.map(|d| d.round_dp(2).to_string()).unwrap_or_default()
}

/// 盈亏单元格：正值绿色、负值红色、零无色、缺省为空
fn colored_pnl_cell(value: Option<Decimal>) -> String {
    match value {
        None => String::new(),
        Some(v) => {
            let text = v.round_dp(2).to_string();
            if v > Decimal::ZERO {
                format!("<span class=\"pnl-profit\">{}</span>", text)
            } else if v < Decimal::ZERO {
                format!("<span class=\"pnl-loss\">{}</span>", text)
            } else {
                text
            }
        }
    }
}

/// 标的代码与时间来自外部输入，入表前做最小转义
fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
