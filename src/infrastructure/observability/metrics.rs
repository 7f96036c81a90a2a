//! Prometheus Metrics Module
//!
//! 健康检查子系统的核心指标
//!
//! ## 指标类型
//! - **Histogram**: 每个依赖检查的耗时（秒）
//! - **Gauge**: 每个依赖的状态（1=健康, 0=不健康）、处理中请求数、版本信息、启动时间
//! - **Counter**: HTTP 请求总数（按方法和状态码）
//!
//! `Metrics` 自带独立的 `Registry`，在进程启动时构造一次，
//! 通过 `Arc<Metrics>` 注入到需要记录指标的组件
//!
//! ## 使用示例
//! ```rust,ignore
//! let metrics = Arc::new(Metrics::new("0.1.0")?);
//!
//! metrics.observe_latency("database", 0.005);
//! metrics.set_status("database", true);
//!
//! let _guard = metrics.track_request();
//! // ... 处理请求 ...
//! ```

use prometheus::{
    Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};

use crate::shared::timestamp::unix_timestamp_secs;

/// 检查耗时的分桶（秒）
pub const HEALTH_CHECK_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

/// 健康检查子系统指标
pub struct Metrics {
    registry: Registry,

    /// 检查耗时分布 (按 check_name)
    pub health_check_duration: HistogramVec,

    /// 检查状态 (按 check_name)
    pub health_check_status: GaugeVec,

    /// 处理中的请求数
    pub active_requests: Gauge,

    /// 版本信息，值恒为 1
    pub app_info: GaugeVec,

    /// 进程启动时间 (Unix 秒)
    pub app_start_time: Gauge,

    /// 请求总数 (按 method, status)
    pub http_requests_total: IntCounterVec,
}

impl Metrics {
    /// 创建指标并注册到独立的 Registry
    pub fn new(version: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let health_check_duration = HistogramVec::new(
            HistogramOpts::new(
                "pulsewatch_health_check_duration_seconds",
                "Health check execution time",
            )
            .buckets(HEALTH_CHECK_BUCKETS.to_vec()),
            &["check_name"],
        )?;

        let health_check_status = GaugeVec::new(
            Opts::new(
                "pulsewatch_health_check_status",
                "Health check status (1=healthy, 0=unhealthy)",
            ),
            &["check_name"],
        )?;

        let active_requests = Gauge::new(
            "pulsewatch_active_requests",
            "Number of requests currently being processed",
        )?;

        let app_info = GaugeVec::new(
            Opts::new("pulsewatch_app_info", "Application information"),
            &["version"],
        )?;

        let app_start_time = Gauge::new(
            "pulsewatch_app_start_time_seconds",
            "Unix timestamp of application start",
        )?;

        let http_requests_total = IntCounterVec::new(
            Opts::new(
                "pulsewatch_http_requests_total",
                "Total number of HTTP requests handled",
            ),
            &["method", "status"],
        )?;

        registry.register(Box::new(health_check_duration.clone()))?;
        registry.register(Box::new(health_check_status.clone()))?;
        registry.register(Box::new(active_requests.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(app_start_time.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        app_info.with_label_values(&[version]).set(1.0);
        app_start_time.set(unix_timestamp_secs());

        Ok(Self {
            registry,
            health_check_duration,
            health_check_status,
            active_requests,
            app_info,
            app_start_time,
            http_requests_total,
        })
    }

    /// 记录一次检查耗时
    #[inline]
    pub fn observe_latency(&self, check_name: &str, seconds: f64) {
        self.health_check_duration
            .with_label_values(&[check_name])
            .observe(seconds.max(0.0));
    }

    /// 记录检查状态
    #[inline]
    pub fn set_status(&self, check_name: &str, is_healthy: bool) {
        self.health_check_status
            .with_label_values(&[check_name])
            .set(if is_healthy { 1.0 } else { 0.0 });
    }

    /// 请求开始：处理中请求数 +1，返回的守卫在 drop 时 -1
    pub fn track_request(&self) -> InFlightGuard {
        self.active_requests.inc();
        InFlightGuard {
            gauge: self.active_requests.clone(),
        }
    }

    /// 记录一次已完成的请求
    ///
    /// 方法标签经 [`method_label`] 归一化，客户端自定义的方法不会产生新的序列
    pub fn record_response(&self, method: &str, status: u16) {
        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[method_label(method), status.as_str()])
            .inc();
    }

    /// 导出Prometheus格式的指标
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// 把请求方法映射到固定的标签集合，其余一律为 `other`
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "PATCH" => "PATCH",
        "DELETE" => "DELETE",
        "OPTIONS" => "OPTIONS",
        _ => "other",
    }
}

/// 处理中请求的计数守卫
///
/// 请求被取消或处理函数 panic 时同样会递减
pub struct InFlightGuard {
    gauge: Gauge,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
