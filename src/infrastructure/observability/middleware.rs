//! Request Middleware
//!
//! - `request_correlation` - 为每个请求生成 `X-Request-ID`，
//!   建立携带 request_id/method/path/client_ip 的 tracing span，
//!   记录请求开始和完成日志
//! - `track_in_flight` - 维护处理中请求数和请求计数
//!
//! 上下文通过 span 和请求扩展显式传递，不使用线程本地状态，
//! 因此在同一工作线程上交替执行的请求之间不会串号

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, Instrument};

use super::metrics::Metrics;
use crate::shared::context::RequestContext;

/// 关联 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 代理转发的客户端地址头
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// 请求关联中间件
pub async fn request_correlation(mut req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let ctx = RequestContext::new(
        req.method().as_str(),
        req.uri().path(),
        client_ip(req.headers(), peer),
    );

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let span = info_span!(
        "request",
        request_id = %ctx.request_id,
        method = %ctx.method,
        path = %ctx.path,
        client_ip = %ctx.client_ip,
    );

    let request_id = ctx.request_id;
    req.extensions_mut().insert(ctx);

    async move {
        let started = Instant::now();
        info!(user_agent = %user_agent, "request_started");

        let mut response = next.run(req).await;

        info!(
            status_code = response.status().as_u16(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "request_completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 处理中请求数与请求计数中间件
pub async fn track_in_flight(
    State(metrics): State<Arc<Metrics>>,
    req: Request,
    next: Next,
) -> Response {
    let _guard = metrics.track_request();
    let method = req.method().clone();

    let response = next.run(req).await;
    metrics.record_response(method.as_str(), response.status().as_u16());

    response
}

/// 提取客户端 IP
///
/// 优先使用 `X-Forwarded-For` 的第一个地址，否则使用对端地址
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}
