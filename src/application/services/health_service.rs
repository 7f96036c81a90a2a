/// Health Service - Liveness and Readiness Aggregation
///
/// Liveness never touches a dependency: the process answering is the whole
/// answer. Readiness runs every registered probe and folds the results into
/// one verdict.
///
/// ## Aggregation rule
/// - `ready` iff every probe reports exactly `healthy`
/// - a `degraded` probe fails readiness like an `unhealthy` one
/// - HTTP 200 when ready, 503 otherwise
///
/// ## Concurrency
/// Probes run concurrently and are joined before the report is built, so a
/// report always contains every registered probe. Each probe is bounded by
/// the runner's timeout, which makes that timeout the deadline of the whole
/// evaluation.
///
/// ## Usage
/// ```rust,ignore
/// let registry = ProbeRegistry::new(vec![database, redis])?;
/// let runner = ProbeRunner::new(metrics.clone()).with_timeout(Duration::from_secs(5));
/// let service = HealthService::new(registry, runner, env!("CARGO_PKG_VERSION"));
///
/// let report = service.evaluate(&RequestContext::background()).await;
/// assert_eq!(report.checks.len(), 2);
/// ```

use futures::future::join_all;

use crate::application::services::probe_runner::ProbeRunner;
use crate::application::services::registry::ProbeRegistry;
use crate::domain::health::{CheckResults, LivenessReport, ReadinessReport};
use crate::shared::context::RequestContext;
use crate::shared::timestamp::iso8601_now;

pub struct HealthService {
    registry: ProbeRegistry,
    runner: ProbeRunner,
    version: String,
}

impl HealthService {
    pub fn new(registry: ProbeRegistry, runner: ProbeRunner, version: impl Into<String>) -> Self {
        Self {
            registry,
            runner,
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    /// Liveness report; performs no dependency checks
    pub fn liveness(&self) -> LivenessReport {
        LivenessReport::new(self.version.clone(), iso8601_now())
    }

    /// Runs all probes and builds the readiness report. Never fails.
    pub async fn evaluate(&self, ctx: &RequestContext) -> ReadinessReport {
        let runner = &self.runner;
        let pending = self.registry.iter().map(|probe| async move {
            let result = runner.run(probe.as_ref(), ctx).await;
            (probe.name().to_string(), result)
        });

        // join_all keeps input order, so checks stay in registration order
        let checks = CheckResults::new(join_all(pending).await);

        ReadinessReport::from_checks(checks, self.version.clone(), iso8601_now())
    }
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("registry", &self.registry)
            .field("timeout", &self.runner.timeout())
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::health::{ProbeStatus, ReadinessStatus};
    use crate::domain::probe::{DependencyCheck, ProbeError};
    use crate::infrastructure::observability::metrics::Metrics;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    struct StaticCheck {
        name: &'static str,
        healthy: bool,
        delay: Duration,
    }

    #[async_trait]
    impl DependencyCheck for StaticCheck {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self) -> Result<String, ProbeError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.healthy {
                Ok(format!("{} connection successful", self.name))
            } else {
                Err(ProbeError::failed(format!("{} connection failed: refused", self.name)))
            }
        }
    }

    fn probe(name: &'static str, healthy: bool, delay: Duration) -> Arc<dyn DependencyCheck> {
        Arc::new(StaticCheck {
            name,
            healthy,
            delay,
        })
    }

    fn service(probes: Vec<Arc<dyn DependencyCheck>>, timeout: Duration) -> HealthService {
        let metrics = Arc::new(Metrics::new("0.1.0").unwrap());
        let registry = ProbeRegistry::new(probes).unwrap();
        let runner = ProbeRunner::new(metrics).with_timeout(timeout);
        HealthService::new(registry, runner, "0.1.0")
    }

    #[tokio::test]
    async fn test_all_healthy_is_ready() {
        let service = service(
            vec![
                probe("database", true, Duration::ZERO),
                probe("redis", true, Duration::ZERO),
            ],
            Duration::from_secs(1),
        );

        let report = service.evaluate(&RequestContext::background()).await;
        assert_eq!(report.status, ReadinessStatus::Ready);
        assert_eq!(report.http_status(), 200);
        assert_eq!(report.version, "0.1.0");
        assert_eq!(report.checks.names().collect::<Vec<_>>(), vec!["database", "redis"]);
    }

    #[tokio::test]
    async fn test_one_unhealthy_is_not_ready() {
        let service = service(
            vec![
                probe("database", false, Duration::ZERO),
                probe("redis", true, Duration::ZERO),
            ],
            Duration::from_secs(1),
        );

        let report = service.evaluate(&RequestContext::background()).await;
        assert_eq!(report.status, ReadinessStatus::NotReady);
        assert_eq!(report.http_status(), 503);
        assert_eq!(
            report.checks.get("database").unwrap().status,
            ProbeStatus::Unhealthy
        );
        assert_eq!(report.checks.get("redis").unwrap().status, ProbeStatus::Healthy);
    }

    #[tokio::test]
    async fn test_hung_probe_times_out_without_dropping_others() {
        let service = service(
            vec![
                probe("database", true, Duration::from_secs(30)),
                probe("redis", true, Duration::ZERO),
            ],
            Duration::from_millis(50),
        );

        let report = service.evaluate(&RequestContext::background()).await;
        assert_eq!(report.checks.len(), 2);
        let database = report.checks.get("database").unwrap();
        assert_eq!(database.status, ProbeStatus::Unhealthy);
        assert_eq!(database.message, "timeout");
        assert!(!report.is_ready());
    }

    #[tokio::test]
    async fn test_probes_run_concurrently() {
        let service = service(
            vec![
                probe("database", true, Duration::from_millis(200)),
                probe("redis", true, Duration::from_millis(200)),
                probe("search", true, Duration::from_millis(200)),
            ],
            Duration::from_secs(5),
        );

        let start = Instant::now();
        let report = service.evaluate(&RequestContext::background()).await;
        assert!(report.is_ready());
        // 顺序执行需要 600ms 以上
        assert!(start.elapsed() < Duration::from_millis(550));
    }

    #[test]
    fn test_liveness_does_not_depend_on_probes() {
        let service = service(
            vec![probe("database", false, Duration::from_secs(30))],
            Duration::from_secs(1),
        );

        let report = service.liveness();
        assert_eq!(report.status, ProbeStatus::Healthy);
        assert_eq!(report.version, "0.1.0");
        assert!(report.timestamp.ends_with('Z'));
    }
}
