//! Observability Module
//!
//! 提供健康检查子系统的可观测性功能：
//! - Prometheus metrics
//! - 存活/就绪检查端点
//! - 请求关联中间件
//! - 结构化日志初始化
//!
//! ## 模块结构
//! - `metrics` - 指标定义与导出
//! - `http_server` - HTTP服务器与路由
//! - `middleware` - 请求关联与处理中请求计数
//! - `logging` - tracing-subscriber 初始化

pub mod http_server;
pub mod logging;
pub mod metrics;
pub mod middleware;

pub use http_server::{router, AppState, HealthServer};
pub use logging::{init_logging, LogFormat};
pub use metrics::Metrics;
pub use middleware::REQUEST_ID_HEADER;
