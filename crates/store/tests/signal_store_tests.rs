use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use soneki_core::signal::entity::{EventKind, NewSignal, Signal};
use soneki_core::store::port::{PnlBackfill, SignalStore};
use soneki_store::config::set_data_root;
use soneki_store::signal::SqliteSignalStore;
use tempfile::tempdir;

fn buy(symbol: &str, price: Decimal) -> NewSignal {
    NewSignal {
        symbol: symbol.to_string(),
        event: EventKind::Buy,
        price,
        lots: Some(dec!(1)),
        lot_size: Some(dec!(50)),
        quantity: Some(dec!(50)),
        trade_value: Some(price * dec!(50)),
        total_purchase: None,
        position: None,
        avg_buy_price: None,
        time: "01-06-2024 15:30:00".to_string(),
        pnl: None,
        cumulative_pnl: Some(Decimal::ZERO),
    }
}

fn sell(symbol: &str, price: Decimal, pnl: Option<Decimal>) -> NewSignal {
    NewSignal {
        event: EventKind::Sell,
        pnl,
        cumulative_pnl: pnl,
        ..buy(symbol, price)
    }
}

#[tokio::test]
async fn test_signal_store_full_integration() {
    // 1. 初始化临时测试环境
    let tmp_dir = tempdir().expect("Failed to create temp dir");
    set_data_root(tmp_dir.path().to_path_buf());

    let store = SqliteSignalStore::new()
        .await
        .expect("Failed to create signal store");

    // 空日志边界
    assert!(store.last_record().await.unwrap().is_none());
    assert!(store.all_records().await.unwrap().is_empty());
    assert!(store.earliest_unmatched_buy("AAPL").await.unwrap().is_none());

    // 2. 追加：id 从 1 起严格递增
    let first = store.append(buy("AAPL", dec!(100)), None).await.unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(first.price, dec!(100));
    assert_eq!(first.trade_value, Some(dec!(5000)));

    let second = store.append(buy("AAPL", dec!(110)), None).await.unwrap();
    let third = store.append(buy("TSLA", dec!(200)), None).await.unwrap();
    assert_eq!(second.id, 2);
    assert_eq!(third.id, 3);

    let last = store.last_record().await.unwrap().unwrap();
    assert_eq!(last.id, 3);
    assert_eq!(last.symbol, "TSLA");

    // 3. 过滤查询按 id 升序
    let aapl: Vec<Signal> = store.records_for_symbol("AAPL").await.unwrap();
    assert_eq!(aapl.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);

    // FIFO 队首 = 最早未配对买入
    let head = store.earliest_unmatched_buy("AAPL").await.unwrap().unwrap();
    assert_eq!(head.id, 1);

    // 4. 原子追加 + 回填：卖出落库的同时 1 号买入被标记
    let fill = PnlBackfill { id: 1, pnl: dec!(20) };
    let sold = store
        .append(sell("AAPL", dec!(120), Some(dec!(20))), Some(fill))
        .await
        .unwrap();
    assert_eq!(sold.id, 4);
    assert_eq!(sold.pnl, Some(dec!(20)));

    let matched = &store.records_for_symbol("AAPL").await.unwrap()[0];
    assert_eq!(matched.pnl, Some(dec!(20)));

    // 队首前移到 2 号
    let head = store.earliest_unmatched_buy("AAPL").await.unwrap().unwrap();
    assert_eq!(head.id, 2);

    // 5. 回填目标已配对 → 整个单元回滚，卖出记录不得出现
    let stale = PnlBackfill { id: 1, pnl: dec!(5) };
    let err = store
        .append(sell("AAPL", dec!(125), Some(dec!(5))), Some(stale))
        .await;
    assert!(err.is_err());
    assert_eq!(store.all_records().await.unwrap().len(), 4);
    assert_eq!(store.records_for_symbol("AAPL").await.unwrap()[0].pnl, Some(dec!(20)));

    // 回填目标不存在同理
    let ghost = PnlBackfill { id: 999, pnl: dec!(1) };
    assert!(store
        .append(sell("AAPL", dec!(125), Some(dec!(1))), Some(ghost))
        .await
        .is_err());
    assert_eq!(store.all_records().await.unwrap().len(), 4);

    // 6. 读取不改变任何记录 (幂等)
    let before = store.all_records().await.unwrap();
    let again = store.all_records().await.unwrap();
    assert_eq!(before.len(), again.len());
    for (a, b) in before.iter().zip(again.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.pnl, b.pnl);
        assert_eq!(a.cumulative_pnl, b.cumulative_pnl);
    }

    // 7. Decimal 以 TEXT 落库后精度无损
    let exact = store
        .append(buy("INFY", dec!(1456.35)), None)
        .await
        .unwrap();
    let reread = store.last_record().await.unwrap().unwrap();
    assert_eq!(exact.price, dec!(1456.35));
    assert_eq!(reread.price, dec!(1456.35));

    // 8. 整表清空后 id 重新从 1 计数
    store.delete_all().await.unwrap();
    assert!(store.all_records().await.unwrap().is_empty());
    let fresh = store.append(buy("AAPL", dec!(90)), None).await.unwrap();
    assert_eq!(fresh.id, 1);
}
