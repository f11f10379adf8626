use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 展示时区固定偏移量：Asia/Kolkata (UTC+05:30，无夏令时)
pub const KOLKATA_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// 落库展示格式，例如 "01-03-2026 15:30:00"
pub const DISPLAY_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// 接受的 ISO-8601 UTC 严格格式
const ISO_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// # Summary
/// 报警平台上送的原始时间字段。允许两种形态：
/// UTC 毫秒时间戳整数，或严格的 `YYYY-MM-DDTHH:MM:SSZ` 字符串。
/// 其余任何形态在反序列化或解析阶段即被拒绝。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// UTC epoch 毫秒
    Millis(i64),
    /// ISO-8601 UTC 字符串
    Iso(String),
}

/// # Summary
/// 时间归一化阶段的错误。消息必须点名被拒绝的原始值。
#[derive(Error, Debug)]
pub enum TimeError {
    #[error("Unsupported time format received: {0}")]
    Unsupported(String),
    #[error("Timestamp out of range: {0}")]
    OutOfRange(i64),
}

/// # Summary
/// 将原始时间归一化为固定本地时区 (UTC+05:30) 的展示字符串。
///
/// # Invariants
/// - 输出仅用于展示。排序与对比一律以记录 `id` 为准，绝不使用该字符串。
/// - 同一时刻的毫秒输入与 ISO 输入必须产出完全相同的字符串。
///
/// # Arguments
/// * `raw` - 原始时间字段。
///
/// # Returns
/// * 格式化后的本地时间字符串，或 `TimeError`。
pub fn to_display_time(raw: &RawTimestamp) -> Result<String, TimeError> {
    let utc: DateTime<Utc> = match raw {
        RawTimestamp::Millis(ms) => Utc
            .timestamp_millis_opt(*ms)
            .single()
            .ok_or(TimeError::OutOfRange(*ms))?,
        RawTimestamp::Iso(s) => {
            let naive = NaiveDateTime::parse_from_str(s, ISO_UTC_FORMAT)
                .map_err(|_| TimeError::Unsupported(s.clone()))?;
            Utc.from_utc_datetime(&naive)
        }
    };

    // +05:30 恒在 FixedOffset 合法范围内，失败分支仅为类型完整性保留
    let ist = FixedOffset::east_opt(KOLKATA_OFFSET_SECS)
        .ok_or_else(|| TimeError::Unsupported("UTC+05:30".to_string()))?;

    Ok(utc.with_timezone(&ist).format(DISPLAY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_and_iso_agree_on_same_instant() {
        // 2024-06-01T10:00:00Z == 1717236000000 ms
        let from_millis = to_display_time(&RawTimestamp::Millis(1_717_236_000_000)).unwrap();
        let from_iso =
            to_display_time(&RawTimestamp::Iso("2024-06-01T10:00:00Z".to_string())).unwrap();
        assert_eq!(from_millis, from_iso);
        // UTC 10:00 + 05:30 = 15:30 当日
        assert_eq!(from_millis, "01-06-2024 15:30:00");
    }

    #[test]
    fn offset_crosses_midnight() {
        // UTC 21:00 + 05:30 = 次日 02:30
        let s = to_display_time(&RawTimestamp::Iso("2024-12-31T21:00:00Z".to_string())).unwrap();
        assert_eq!(s, "01-01-2025 02:30:00");
    }

    #[test]
    fn rejects_garbage_string() {
        let err = to_display_time(&RawTimestamp::Iso("yesterday at noon".to_string())).unwrap_err();
        assert!(err.to_string().contains("yesterday at noon"));
    }

    #[test]
    fn rejects_fractional_or_offset_forms() {
        // 带毫秒或带显式偏移的 ISO 形式不在严格格式内
        assert!(to_display_time(&RawTimestamp::Iso("2024-06-01T10:00:00.000Z".into())).is_err());
        assert!(to_display_time(&RawTimestamp::Iso("2024-06-01T10:00:00+05:30".into())).is_err());
    }

    #[test]
    fn untagged_deserialization_picks_right_variant() {
        let millis: RawTimestamp = serde_json::from_str("1717236000000").unwrap();
        assert_eq!(millis, RawTimestamp::Millis(1_717_236_000_000));
        let iso: RawTimestamp = serde_json::from_str("\"2024-06-01T10:00:00Z\"").unwrap();
        assert_eq!(iso, RawTimestamp::Iso("2024-06-01T10:00:00Z".to_string()));
        // 布尔等异常类型直接在反序列化阶段失败
        assert!(serde_json::from_str::<RawTimestamp>("true").is_err());
    }
}
