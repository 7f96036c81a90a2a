/// Probe Runner - Timed, Classified Dependency Checks
///
/// Wraps a `DependencyCheck` so that every invocation produces a
/// `ProbeResult`, whatever the check does:
/// - `Ok(message)` → `healthy`, or `degraded` when slower than the threshold
/// - `Err(e)` → `unhealthy` with the error text as message
/// - no answer within the timeout → `unhealthy` with message `"timeout"`
/// - panic → `unhealthy` with the panic payload in the message
///
/// Every path records exactly one latency observation and one status gauge
/// update before the result is returned.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tracing::{error, info, warn};

use crate::domain::health::{ProbeResult, ProbeStatus};
use crate::domain::probe::{DependencyCheck, ProbeError};
use crate::infrastructure::observability::metrics::Metrics;
use crate::shared::context::RequestContext;

/// Default upper bound for a single check
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ProbeRunner {
    metrics: Arc<Metrics>,
    timeout: Duration,
    degraded_threshold: Option<Duration>,
}

impl ProbeRunner {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics,
            timeout: DEFAULT_PROBE_TIMEOUT,
            degraded_threshold: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Successful checks slower than `threshold` are reported as degraded
    pub fn with_degraded_threshold(mut self, threshold: Option<Duration>) -> Self {
        self.degraded_threshold = threshold;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one check and classifies its outcome. Never fails.
    pub async fn run(&self, probe: &dyn DependencyCheck, ctx: &RequestContext) -> ProbeResult {
        let name = probe.name();
        let start = Instant::now();

        let outcome = match tokio::time::timeout(
            self.timeout,
            AssertUnwindSafe(probe.check()).catch_unwind(),
        )
        .await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(payload)) => Err(ProbeError::Panicked(panic_message(payload.as_ref()))),
            Err(_) => Err(ProbeError::Timeout),
        };

        let elapsed = start.elapsed();
        let result = self.classify(outcome, elapsed);

        self.metrics.observe_latency(name, elapsed.as_secs_f64());
        self.metrics.set_status(name, result.status.is_healthy());

        match result.status {
            ProbeStatus::Healthy => info!(
                request_id = %ctx.request_id,
                check = name,
                latency_ms = result.latency_ms,
                "{}",
                event_name(name, "success")
            ),
            ProbeStatus::Degraded => warn!(
                request_id = %ctx.request_id,
                check = name,
                latency_ms = result.latency_ms,
                message = %result.message,
                "{}",
                event_name(name, "degraded")
            ),
            ProbeStatus::Unhealthy => error!(
                request_id = %ctx.request_id,
                check = name,
                latency_ms = result.latency_ms,
                error = %result.message,
                "{}",
                event_name(name, "failed")
            ),
        }

        result
    }

    fn classify(&self, outcome: Result<String, ProbeError>, elapsed: Duration) -> ProbeResult {
        match outcome {
            Ok(message) => match self.degraded_threshold {
                Some(threshold) if elapsed > threshold => ProbeResult::degraded(
                    elapsed,
                    format!(
                        "{} (slow: {:.2} ms > {} ms)",
                        message,
                        elapsed.as_secs_f64() * 1000.0,
                        threshold.as_millis()
                    ),
                ),
                _ => ProbeResult::healthy(elapsed, message),
            },
            Err(e) => ProbeResult::unhealthy(elapsed, e.to_string()),
        }
    }
}

/// 日志事件名，如 `database_health_check_success`
fn event_name(check: &str, outcome: &str) -> String {
    format!("{}_health_check_{}", check, outcome)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_support::CapturedLogs;
    use async_trait::async_trait;

    enum Behaviour {
        Succeed,
        Fail(&'static str),
        Hang,
        Panic,
        Slow(Duration),
        EmptyError,
    }

    struct FakeCheck {
        name: &'static str,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl DependencyCheck for FakeCheck {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self) -> Result<String, ProbeError> {
            match self.behaviour {
                Behaviour::Succeed => Ok("reachable".to_string()),
                Behaviour::Fail(msg) => Err(ProbeError::failed(msg)),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("too late".to_string())
                }
                Behaviour::Panic => panic!("driver exploded"),
                Behaviour::Slow(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok("reachable".to_string())
                }
                Behaviour::EmptyError => Err(ProbeError::failed("")),
            }
        }
    }

    fn runner() -> (ProbeRunner, Arc<Metrics>) {
        let metrics = Arc::new(Metrics::new("0.1.0").unwrap());
        (ProbeRunner::new(metrics.clone()), metrics)
    }

    fn check(name: &'static str, behaviour: Behaviour) -> FakeCheck {
        FakeCheck { name, behaviour }
    }

    fn samples(metrics: &Metrics, name: &str) -> u64 {
        metrics
            .health_check_duration
            .with_label_values(&[name])
            .get_sample_count()
    }

    fn status_gauge(metrics: &Metrics, name: &str) -> f64 {
        metrics.health_check_status.with_label_values(&[name]).get()
    }

    #[tokio::test]
    async fn test_success_is_healthy() {
        let (runner, metrics) = runner();
        let ctx = RequestContext::background();

        let result = runner.run(&check("database", Behaviour::Succeed), &ctx).await;
        assert_eq!(result.status, ProbeStatus::Healthy);
        assert_eq!(result.message, "reachable");
        assert!(result.latency_ms >= 0.0);

        assert_eq!(samples(&metrics, "database"), 1);
        assert_eq!(status_gauge(&metrics, "database"), 1.0);
    }

    #[tokio::test]
    async fn test_failure_is_unhealthy_and_still_recorded() {
        let (runner, metrics) = runner();
        let ctx = RequestContext::background();

        let result = runner
            .run(
                &check("database", Behaviour::Fail("Database connection failed: refused")),
                &ctx,
            )
            .await;
        assert_eq!(result.status, ProbeStatus::Unhealthy);
        assert_eq!(result.message, "Database connection failed: refused");
        assert!(result.latency_ms >= 0.0);

        assert_eq!(samples(&metrics, "database"), 1);
        assert_eq!(status_gauge(&metrics, "database"), 0.0);
    }

    #[tokio::test]
    async fn test_timeout_is_unhealthy() {
        let (runner, metrics) = runner();
        let runner = runner.with_timeout(Duration::from_millis(20));
        let ctx = RequestContext::background();

        let result = runner.run(&check("redis", Behaviour::Hang), &ctx).await;
        assert_eq!(result.status, ProbeStatus::Unhealthy);
        assert_eq!(result.message, "timeout");
        assert!(result.latency_ms >= 20.0);
        assert_eq!(samples(&metrics, "redis"), 1);
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let (runner, metrics) = runner();
        let ctx = RequestContext::background();

        let result = runner.run(&check("redis", Behaviour::Panic), &ctx).await;
        assert_eq!(result.status, ProbeStatus::Unhealthy);
        assert_eq!(result.message, "probe panicked: driver exploded");
        assert_eq!(status_gauge(&metrics, "redis"), 0.0);
        assert_eq!(samples(&metrics, "redis"), 1);
    }

    #[tokio::test]
    async fn test_empty_error_message_is_filled() {
        let (runner, _metrics) = runner();
        let ctx = RequestContext::background();

        let result = runner.run(&check("redis", Behaviour::EmptyError), &ctx).await;
        assert_eq!(result.status, ProbeStatus::Unhealthy);
        assert!(!result.message.is_empty());
    }

    #[tokio::test]
    async fn test_slow_success_is_degraded() {
        let (runner, metrics) = runner();
        let runner = runner.with_degraded_threshold(Some(Duration::from_millis(5)));
        let ctx = RequestContext::background();

        let result = runner
            .run(&check("database", Behaviour::Slow(Duration::from_millis(30))), &ctx)
            .await;
        assert_eq!(result.status, ProbeStatus::Degraded);
        assert!(result.message.starts_with("reachable (slow:"));
        // 降级不算健康
        assert_eq!(status_gauge(&metrics, "database"), 0.0);
    }

    #[tokio::test]
    async fn test_fast_success_below_threshold_is_healthy() {
        let (runner, _metrics) = runner();
        let runner = runner.with_degraded_threshold(Some(Duration::from_secs(10)));
        let ctx = RequestContext::background();

        let result = runner.run(&check("database", Behaviour::Succeed), &ctx).await;
        assert_eq!(result.status, ProbeStatus::Healthy);
    }

    #[test]
    fn test_event_name_is_prefixed_by_check() {
        assert_eq!(event_name("database", "success"), "database_health_check_success");
        assert_eq!(event_name("redis", "failed"), "redis_health_check_failed");
    }

    #[tokio::test]
    async fn test_log_events_are_named_after_the_check() {
        let (logs, _guard) = CapturedLogs::install();
        let (runner, _metrics) = runner();
        let ctx = RequestContext::background();

        runner.run(&check("database", Behaviour::Succeed), &ctx).await;
        runner
            .run(&check("redis", Behaviour::Fail("Redis connection failed: refused")), &ctx)
            .await;

        let success = logs
            .line("database_health_check_success")
            .expect("missing database success event");
        assert!(success.contains("\"check\":\"database\""));
        assert!(success.contains("\"level\":\"INFO\""));

        let failed = logs
            .line("redis_health_check_failed")
            .expect("missing redis failure event");
        assert!(failed.contains("Redis connection failed: refused"));
        assert!(failed.contains("\"level\":\"ERROR\""));
        assert!(logs.line("health_check_success").is_none());
    }
}
