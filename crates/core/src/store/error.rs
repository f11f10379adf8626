use thiserror::Error;

/// # Summary
/// 信号事件存储的错误枚举。
///
/// # Invariants
/// - `NotFound` 专指回填目标失效：被配对的买入缺失或已被先前的
///   卖出配对，此时整个原子追加单元必须已回滚。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 信号数据库读写失败
    #[error("Signal database error: {0}")]
    Database(String),
    /// 回填目标买入缺失或已配对
    #[error("Backfill target missing or already matched")]
    NotFound,
    /// 打开数据目录或初始化 signals 表失败
    #[error("Signal store initialization failed: {0}")]
    InitError(String),
    /// 适配器内部的意外失败 (如内存适配器的 id 宽度越界)
    #[error("Unexpected store failure: {0}")]
    Unknown(String),
}
