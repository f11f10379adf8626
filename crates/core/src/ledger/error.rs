use crate::common::time::TimeError;
use crate::store::error::StoreError;
use thiserror::Error;

/// # Summary
/// 摄入与 PnL 计算环节的错误。区分"输入不合法"与"存储层失败"，
/// 由 HTTP 边界映射到不同状态码，绝不吞掉任何一类。
#[derive(Error, Debug)]
pub enum LedgerError {
    /// 输入字段缺失、类型错误或数值非法。不落库，对进程无害。
    #[error("{0}")]
    Validation(String),
    /// 底层存储不可用或写入失败
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<TimeError> for LedgerError {
    fn from(err: TimeError) -> Self {
        LedgerError::Validation(err.to_string())
    }
}
