//! HTTP Health Server
//!
//! 提供存活/就绪检查和Prometheus metrics端点
//!
//! ## 端点
//! - `GET /healthz` - 存活检查（不检查任何依赖，始终 200）
//! - `GET /ready` - 就绪检查（所有依赖健康 200，否则 503）
//! - `GET /metrics` - Prometheus格式的指标
//!
//! 所有端点无需认证：编排系统的探针无法携带凭据
//!
//! ## 使用示例
//! ```rust,ignore
//! let server = HealthServer::new(addr, state);
//! server.run(shutdown_signal()).await?;
//! ```

use axum::{
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{error, info};

use super::metrics::Metrics;
use super::middleware::{request_correlation, track_in_flight};
use crate::application::services::HealthService;
use crate::domain::health::CheckResults;
use crate::infrastructure::probes::{CACHE_CHECK, DATABASE_CHECK};
use crate::shared::context::RequestContext;
use crate::shared::error::{ApiError, ServerError};

/// 处理函数共享状态
#[derive(Clone)]
pub struct AppState {
    pub health: Arc<HealthService>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(health: Arc<HealthService>, metrics: Arc<Metrics>) -> Self {
        Self { health, metrics }
    }
}

/// 构建路由（含中间件），测试直接使用
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(liveness_handler))
        .route("/healthz/", get(liveness_handler))
        .route("/ready", get(readiness_handler))
        .route("/ready/", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .fallback(fallback_handler)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_correlation))
                .layer(middleware::from_fn_with_state(
                    state.metrics.clone(),
                    track_in_flight,
                )),
        )
        .with_state(state)
}

/// 健康检查服务器
pub struct HealthServer {
    addr: SocketAddr,
    state: AppState,
}

impl HealthServer {
    /// 创建新的服务器
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// 启动HTTP服务器，`shutdown` 完成后优雅退出
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;

        info!(addr = %self.addr, "health server listening");
        info!("存活检查端点: http://{}/healthz", self.addr);
        info!("就绪检查端点: http://{}/ready", self.addr);
        info!("Metrics端点: http://{}/metrics", self.addr);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        info!("health server stopped");
        Ok(())
    }
}

/// 存活检查端点（用于Kubernetes liveness probe）
async fn liveness_handler(State(state): State<AppState>) -> Response {
    let report = state.health.liveness();
    info!(status = "healthy", "healthz_check");
    (StatusCode::OK, Json(report)).into_response()
}

/// 就绪检查端点（用于Kubernetes readiness probe）
async fn readiness_handler(
    State(state): State<AppState>,
    ctx: Option<Extension<RequestContext>>,
) -> Response {
    let ctx = ctx
        .map(|Extension(ctx)| ctx)
        .unwrap_or_else(RequestContext::background);

    let report = state.health.evaluate(&ctx).await;
    let status_code =
        StatusCode::from_u16(report.http_status()).unwrap_or(StatusCode::SERVICE_UNAVAILABLE);

    info!(
        status = report.status.as_str(),
        database_status = dependency_status(&report.checks, DATABASE_CHECK),
        redis_status = dependency_status(&report.checks, CACHE_CHECK),
        checks = %report.checks.summary(),
        "ready_check"
    );

    (status_code, Json(report)).into_response()
}

/// 单个依赖的状态字段，未注册的依赖记为 `absent`
fn dependency_status(checks: &CheckResults, name: &str) -> &'static str {
    checks
        .get(name)
        .map(|result| result.status.as_str())
        .unwrap_or("absent")
}

/// Prometheus metrics端点
async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.export() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "metrics export failed");
            ApiError::Internal(e.to_string()).into_response()
        }
    }
}

async fn fallback_handler() -> ApiError {
    ApiError::NotFound
}
