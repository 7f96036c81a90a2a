/// 时间戳工具
///
/// 响应体使用 ISO-8601（UTC，微秒精度，`Z` 结尾），
/// 指标使用 Unix 秒（浮点）

use chrono::{SecondsFormat, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// 当前 UTC 时间，例如 `2025-10-31T10:30:00.123456Z`
pub fn iso8601_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 当前 Unix 时间戳（秒，含小数部分）
pub fn unix_timestamp_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
