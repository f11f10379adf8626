use std::sync::Arc;

use serde_json::{Value, json};
use soneki_api::server::{AppState, build_router};
use soneki_ledger::average::AverageCostStrategy;
use soneki_ledger::service::IngestService;
use soneki_store::mem::MemorySignalStore;

/// 在随机端口起一个完整服务，返回基地址
async fn spawn_server() -> String {
    let store = Arc::new(MemorySignalStore::new());
    let ingest = Arc::new(IngestService::new(
        store.clone(),
        Arc::new(AverageCostStrategy::new()),
    ));
    let state = AppState { ingest, store };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("no local addr");

    tokio::spawn(async move {
        axum::serve(listener, build_router(state))
            .await
            .expect("test server crashed");
    });

    format!("http://{}", addr)
}

fn buy_payload(symbol: &str, price: f64) -> Value {
    json!({
        "symbol": symbol,
        "event": "BUY",
        "price": price,
        "lots": 1,
        "lot_size": 1,
        "quantity": 1,
        "trade_value": price,
        "time": "2024-06-01T10:00:00Z"
    })
}

#[tokio::test]
async fn webhook_roundtrip_and_listing() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    // 1. 买入事件落库，平铺回显计算字段
    let resp = client
        .post(format!("{}/webhook", base))
        .json(&buy_payload("AAPL", 100.0))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["event"], "buy");
    assert_eq!(body["id"], 1);
    assert_eq!(body["avg_buy_price"], "100");
    assert_eq!(body["pnl"], Value::Null);
    assert_eq!(body["time"], "01-06-2024 15:30:00");

    // 2. 卖出实现盈亏
    let mut sell = buy_payload("AAPL", 120.0);
    sell["event"] = json!("sell");
    let body: Value = client
        .post(format!("{}/webhook", base))
        .json(&sell)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["pnl"], "20");
    assert_eq!(body["cumulative_pnl"], "20");

    // 3. JSON 列表按 id 升序
    let body: Value = client
        .get(format!("{}/api/v1/signals", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[1]["id"], 2);

    // 4. HTML 表格页面
    let html = client
        .get(format!("{}/signals", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("AAPL"));
    assert!(html.contains("pnl-profit"));

    // 5. 清空后列表为空
    let resp = client
        .delete(format!("{}/api/v1/signals", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = client
        .get(format!("{}/api/v1/signals", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn bad_inputs_return_error_shape_and_persist_nothing() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    // 未知事件类型
    let mut payload = buy_payload("AAPL", 100.0);
    payload["event"] = json!("hold");
    let resp = client
        .post(format!("{}/webhook", base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("hold"));

    // 缺少必填字段 (请求体解码失败同样走统一错误形状)
    let resp = client
        .post(format!("{}/webhook", base))
        .json(&json!({"event": "buy"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");

    // 不可解析的时间字符串
    let mut payload = buy_payload("AAPL", 100.0);
    payload["time"] = json!("yesterday at noon");
    let resp = client
        .post(format!("{}/webhook", base))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // 以上失败均未落库
    let body: Value = client
        .get(format!("{}/api/v1/signals", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}
