use async_trait::async_trait;
use rust_decimal::Decimal;
use soneki_core::signal::entity::{NewSignal, Signal};
use soneki_core::store::error::StoreError;
use soneki_core::store::port::{PnlBackfill, SignalStore};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;
use std::str::FromStr;
use tracing::warn;

/// 默认信号数据库文件名
const DEFAULT_SIGNALS_DB: &str = "signals.db";

/// 查询列清单，所有 SELECT 必须保持与 `SignalRow` 同序
const SIGNAL_COLUMNS: &str = "id, symbol, event, price, lots, lot_size, quantity, trade_value, \
     total_purchase, position, avg_buy_price, time, pnl, cumulative_pnl";

/// 与 `SIGNAL_COLUMNS` 一一对应的行元组。
/// 金额类字段以 TEXT 存储，读出后经 `Decimal::from_str` 还原精度。
type SignalRow = (
    i64,            // id
    String,         // symbol
    String,         // event
    String,         // price
    Option<String>, // lots
    Option<String>, // lot_size
    Option<String>, // quantity
    Option<String>, // trade_value
    Option<String>, // total_purchase
    Option<String>, // position
    Option<String>, // avg_buy_price
    String,         // time
    Option<String>, // pnl
    Option<String>, // cumulative_pnl
);

/// # Summary
/// `SignalStore` 的 SQLite 实现。在数据根目录下的 `signals.db`
/// 中维护一张仅追加的 signals 表，`id` 为 SQLite 分配的行号。
///
/// # Invariants
/// * 表结构在存储实例创建时初始化。
/// * 追加与回填共用一个事务，杜绝部分提交可见。
/// * `id` 仅追加场景下严格递增无空洞；整表清空后从 1 重新计数。
pub struct SqliteSignalStore {
    pool: SqlitePool,
}

impl SqliteSignalStore {
    /// 创建新的 SqliteSignalStore 并初始化表结构。
    ///
    /// # Logic
    /// 1. 获取配置的数据根目录并确保其存在。
    /// 2. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 3. 连接到数据库并执行 DDL 初始化 signals 表。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例 or 数据库错误。
    pub async fn new() -> Result<Self, StoreError> {
        let root = crate::config::data_root();
        fs::create_dir_all(&root).map_err(|e| StoreError::InitError(e.to_string()))?;

        let db_path = root.join(DEFAULT_SIGNALS_DB);

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::InitError(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS signals (
                id INTEGER PRIMARY KEY,
                symbol TEXT NOT NULL,
                event TEXT NOT NULL,
                price TEXT NOT NULL,
                lots TEXT,
                lot_size TEXT,
                quantity TEXT,
                trade_value TEXT,
                total_purchase TEXT,
                position TEXT,
                avg_buy_price TEXT,
                time TEXT NOT NULL,
                pnl TEXT,
                cumulative_pnl TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_signals_symbol_event
                ON signals (symbol, event);
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))?;

        Ok(Self { pool })
    }
}

/// 将一行查询结果还原为领域实体。
///
/// # Logic
/// 1. `event` 列经 `EventKind::FromStr` 解析，脏数据视为数据库错误。
/// 2. 金额列从 TEXT 解析回 `Decimal`。
fn row_to_signal(row: SignalRow) -> Result<Signal, StoreError> {
    Ok(Signal {
        id: row.0,
        symbol: row.1,
        event: row.2.parse().map_err(StoreError::Database)?,
        price: parse_decimal(&row.3)?,
        lots: parse_opt_decimal(row.4)?,
        lot_size: parse_opt_decimal(row.5)?,
        quantity: parse_opt_decimal(row.6)?,
        trade_value: parse_opt_decimal(row.7)?,
        total_purchase: parse_opt_decimal(row.8)?,
        position: parse_opt_decimal(row.9)?,
        avg_buy_price: parse_opt_decimal(row.10)?,
        time: row.11,
        pnl: parse_opt_decimal(row.12)?,
        cumulative_pnl: parse_opt_decimal(row.13)?,
    })
}

fn parse_decimal(raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw)
        .map_err(|e| StoreError::Database(format!("Corrupt decimal column '{}': {}", raw, e)))
}

fn parse_opt_decimal(raw: Option<String>) -> Result<Option<Decimal>, StoreError> {
    raw.as_deref().map(parse_decimal).transpose()
}

fn opt_text(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.to_string())
}

#[async_trait]
impl SignalStore for SqliteSignalStore {
    /// # Summary
    /// 取 id 最大的一条记录。
    async fn last_record(&self) -> Result<Option<Signal>, StoreError> {
        let query = format!(
            "SELECT {} FROM signals ORDER BY id DESC LIMIT 1",
            SIGNAL_COLUMNS
        );
        sqlx::query_as::<_, SignalRow>(&query)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(row_to_signal)
            .transpose()
    }

    /// # Summary
    /// 按 id 升序返回全部记录。
    async fn all_records(&self) -> Result<Vec<Signal>, StoreError> {
        let query = format!("SELECT {} FROM signals ORDER BY id ASC", SIGNAL_COLUMNS);
        sqlx::query_as::<_, SignalRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .into_iter()
            .map(row_to_signal)
            .collect()
    }

    /// # Summary
    /// 按 id 升序返回指定标的的全部记录。
    async fn records_for_symbol(&self, symbol: &str) -> Result<Vec<Signal>, StoreError> {
        let query = format!(
            "SELECT {} FROM signals WHERE symbol = ? ORDER BY id ASC",
            SIGNAL_COLUMNS
        );
        sqlx::query_as::<_, SignalRow>(&query)
            .bind(symbol)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .into_iter()
            .map(row_to_signal)
            .collect()
    }

    /// # Summary
    /// 取指定标的最早的未配对买入 (event=buy 且 pnl IS NULL)。
    async fn earliest_unmatched_buy(&self, symbol: &str) -> Result<Option<Signal>, StoreError> {
        let query = format!(
            "SELECT {} FROM signals \
             WHERE symbol = ? AND event = 'buy' AND pnl IS NULL \
             ORDER BY id ASC LIMIT 1",
            SIGNAL_COLUMNS
        );
        sqlx::query_as::<_, SignalRow>(&query)
            .bind(symbol)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(row_to_signal)
            .transpose()
    }

    /// # Summary
    /// 在单个事务内追加新记录并执行可选回填。
    ///
    /// # Logic
    /// 1. INSERT 新记录，取 `last_insert_rowid` 作为分配 id。
    /// 2. 若带回填，UPDATE 目标买入的 pnl；WHERE 条件同时校验目标
    ///    仍未配对，影响行数不为 1 则整个事务回滚。
    /// 3. 读回落库行并提交。
    async fn append(
        &self,
        record: NewSignal,
        backfill: Option<PnlBackfill>,
    ) -> Result<Signal, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let inserted = sqlx::query(
            "INSERT INTO signals \
             (symbol, event, price, lots, lot_size, quantity, trade_value, \
              total_purchase, position, avg_buy_price, time, pnl, cumulative_pnl) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.symbol)
        .bind(record.event.to_string())
        .bind(record.price.to_string())
        .bind(opt_text(record.lots))
        .bind(opt_text(record.lot_size))
        .bind(opt_text(record.quantity))
        .bind(opt_text(record.trade_value))
        .bind(opt_text(record.total_purchase))
        .bind(opt_text(record.position))
        .bind(opt_text(record.avg_buy_price))
        .bind(&record.time)
        .bind(opt_text(record.pnl))
        .bind(opt_text(record.cumulative_pnl))
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let new_id = inserted.last_insert_rowid();

        if let Some(fill) = backfill {
            let updated = sqlx::query(
                "UPDATE signals SET pnl = ? \
                 WHERE id = ? AND event = 'buy' AND pnl IS NULL",
            )
            .bind(fill.pnl.to_string())
            .bind(fill.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

            if updated.rows_affected() != 1 {
                // 事务随 tx 丢弃而回滚，新记录一并消失
                warn!("Backfill target {} missing or already matched", fill.id);
                return Err(StoreError::NotFound);
            }
        }

        let query = format!("SELECT {} FROM signals WHERE id = ?", SIGNAL_COLUMNS);
        let row = sqlx::query_as::<_, SignalRow>(&query)
            .bind(new_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row_to_signal(row)
    }

    /// # Summary
    /// 整表清空。
    async fn delete_all(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM signals")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}
