use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use soneki_core::common::time::RawTimestamp;
use soneki_core::ledger::entity::WebhookEvent;
use soneki_core::ledger::error::LedgerError;
use soneki_core::ledger::port::IngestPort;
use soneki_core::signal::entity::EventKind;
use soneki_core::store::port::SignalStore;
use soneki_ledger::fifo::FifoMatchStrategy;
use soneki_ledger::service::IngestService;
use soneki_store::mem::MemorySignalStore;
use std::sync::Arc;

fn event(kind: &str, price: Decimal) -> WebhookEvent {
    WebhookEvent {
        symbol: "AAPL".to_string(),
        event: kind.to_string(),
        price,
        lots: None,
        lot_size: None,
        quantity: None,
        trade_value: None,
        time: RawTimestamp::Millis(1_717_236_000_000),
    }
}

fn service() -> (Arc<MemorySignalStore>, Arc<IngestService>) {
    let store = Arc::new(MemorySignalStore::new());
    let svc = Arc::new(IngestService::new(
        store.clone(),
        Arc::new(FifoMatchStrategy::new()),
    ));
    (store, svc)
}

#[tokio::test]
async fn rejects_bad_inputs_without_persisting() {
    let (store, svc) = service();

    // 未知事件类型
    let err = svc.ingest(event("hold", dec!(100))).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(err.to_string().contains("hold"));

    // 非正价格
    let err = svc.ingest(event("buy", dec!(0))).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    let err = svc.ingest(event("buy", dec!(-5))).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    // 空标的
    let mut ev = event("buy", dec!(100));
    ev.symbol = "  ".to_string();
    assert!(svc.ingest(ev).await.is_err());

    // 非正的可选数值
    let mut ev = event("buy", dec!(100));
    ev.quantity = Some(dec!(0));
    assert!(svc.ingest(ev).await.is_err());

    // 不可解析的时间字符串，错误消息点名原始值
    let mut ev = event("buy", dec!(100));
    ev.time = RawTimestamp::Iso("not-a-time".to_string());
    let err = svc.ingest(ev).await.unwrap_err();
    assert!(err.to_string().contains("not-a-time"));

    // 全部被拒事件都未落库
    assert!(store.all_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn normalizes_event_case_and_time() {
    let (_store, svc) = service();

    let stored = svc.ingest(event("BUY", dec!(100))).await.unwrap();
    assert_eq!(stored.event, EventKind::Buy);
    // 1717236000000 ms = 2024-06-01T10:00:00Z = 15:30 IST
    assert_eq!(stored.time, "01-06-2024 15:30:00");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_ingestion_stays_serialized() {
    let (store, svc) = service();

    // 并发抛入 20 笔买入；写闸保证 id 分配与累计值读取互不踩踏
    let mut handles = Vec::new();
    for _ in 0..20 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            svc.ingest(event("buy", dec!(100))).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    // 再并发抛入 20 笔卖出；每笔必须配对到不同的买入
    let mut handles = Vec::new();
    for _ in 0..20 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            svc.ingest(event("sell", dec!(120))).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let records = store.all_records().await.unwrap();
    assert_eq!(records.len(), 40);

    // id 严格递增无空洞
    for (idx, s) in records.iter().enumerate() {
        assert_eq!(s.id, i64::try_from(idx).unwrap() + 1);
    }

    // 没有买入被双重配对：恰好 20 条买入各带一次回填
    let matched_buys = records
        .iter()
        .filter(|s| s.event == EventKind::Buy && s.pnl == Some(dec!(20)))
        .count();
    assert_eq!(matched_buys, 20);

    // 终态累计 = 20 × (120 − 100)
    assert_eq!(records.last().unwrap().cumulative_pnl, Some(dec!(400)));
}
