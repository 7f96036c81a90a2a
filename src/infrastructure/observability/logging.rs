//! Logging Setup
//!
//! 基于 tracing-subscriber 的结构化日志：
//! - `json` - 生产环境，每行一个 JSON 对象，包含当前请求 span 的字段
//! - `pretty` - 开发环境控制台输出
//!
//! `RUST_LOG` 优先于命令行指定的日志级别

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// 初始化日志系统，进程内只调用一次
pub fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
}
