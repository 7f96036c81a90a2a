//! Health Report Model
//!
//! 健康检查的领域模型，供存活/就绪两个端点序列化输出
//!
//! ## 响应格式
//! ```json
//! {
//!   "status": "ready",
//!   "timestamp": "2025-10-31T10:30:00.123456Z",
//!   "version": "0.1.0",
//!   "checks": {
//!     "database": {"status": "healthy", "latency_ms": 5.23, "message": "MySQL connection successful"},
//!     "redis": {"status": "healthy", "latency_ms": 1.45, "message": "Redis connection successful"}
//!   }
//! }
//! ```

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 单个依赖的健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// 健康
    Healthy,
    /// 降级（可用但响应过慢）
    Degraded,
    /// 不健康
    Unhealthy,
}

impl ProbeStatus {
    /// 只有严格等于 `Healthy` 才算健康，降级不算
    pub fn is_healthy(self) -> bool {
        matches!(self, ProbeStatus::Healthy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeStatus::Healthy => "healthy",
            ProbeStatus::Degraded => "degraded",
            ProbeStatus::Unhealthy => "unhealthy",
        }
    }
}

/// 单次依赖检查的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// 状态
    pub status: ProbeStatus,
    /// 检查耗时（毫秒，保留两位小数）
    pub latency_ms: f64,
    /// 结果描述，永不为空
    pub message: String,
}

impl ProbeResult {
    /// 创建检查结果
    ///
    /// 耗时取自 `Duration`，因此天然非负；空消息会被替换为默认描述
    pub fn new(status: ProbeStatus, latency: Duration, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            format!("check reported {} without details", status.as_str())
        } else {
            message
        };

        Self {
            status,
            latency_ms: round_millis(latency),
            message,
        }
    }

    pub fn healthy(latency: Duration, message: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Healthy, latency, message)
    }

    pub fn degraded(latency: Duration, message: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Degraded, latency, message)
    }

    pub fn unhealthy(latency: Duration, message: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Unhealthy, latency, message)
    }
}

fn round_millis(latency: Duration) -> f64 {
    let ms = latency.as_secs_f64() * 1000.0;
    ((ms * 100.0).round() / 100.0).max(0.0)
}

/// 就绪检查的总体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

impl ReadinessStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessStatus::Ready => "ready",
            ReadinessStatus::NotReady => "not_ready",
        }
    }
}

/// 按注册顺序保存的检查结果，序列化为 JSON 对象
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckResults(Vec<(String, ProbeResult)>);

impl CheckResults {
    pub fn new(results: Vec<(String, ProbeResult)>) -> Self {
        Self(results)
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.0
            .iter()
            .find(|(check, _)| check == name)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProbeResult)> {
        self.0.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 所有检查都严格为 `Healthy`
    pub fn all_healthy(&self) -> bool {
        self.0.iter().all(|(_, result)| result.status.is_healthy())
    }

    /// 日志用的摘要，例如 `database=healthy redis=unhealthy`
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(name, result)| format!("{}={}", name, result.status.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Serialize for CheckResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, result)| (name, result)))
    }
}

/// 就绪检查响应
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    /// 总体状态
    pub status: ReadinessStatus,
    /// ISO-8601 时间戳（UTC，`Z` 结尾）
    pub timestamp: String,
    /// 版本号
    pub version: String,
    /// 各依赖的检查结果
    pub checks: CheckResults,
}

impl ReadinessReport {
    /// 根据检查结果生成报告，总体状态由结果推导
    pub fn from_checks(
        checks: CheckResults,
        version: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        let status = if checks.all_healthy() {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };

        Self {
            status,
            timestamp: timestamp.into(),
            version: version.into(),
            checks,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }

    /// 就绪返回 200，否则 503
    pub fn http_status(&self) -> u16 {
        if self.is_ready() {
            200
        } else {
            503
        }
    }
}

/// 存活检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessReport {
    /// 进程能响应即为健康
    pub status: ProbeStatus,
    pub timestamp: String,
    pub version: String,
}

impl LivenessReport {
    pub fn new(version: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Healthy,
            timestamp: timestamp.into(),
            version: version.into(),
        }
    }
}
