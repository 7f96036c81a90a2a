//! Cache Probe
//!
//! 写入一个短期探测键，读回并比对
//!
//! 每次检查建立新的多路复用连接，
//! Redis 宕机不影响进程启动

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::domain::probe::{DependencyCheck, ProbeError};

/// 缓存检查名称
pub const CACHE_CHECK: &str = "redis";

/// 探测键
pub const PROBE_KEY: &str = "health_check";

/// 探测值
pub const PROBE_VALUE: &str = "ping";

/// 探测键的过期时间（秒）
pub const PROBE_TTL_SECS: u64 = 10;

/// Redis 连通性检查
pub struct CacheCheck {
    client: redis::Client,
}

impl CacheCheck {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    /// 解析 URL；不建立连接
    pub fn open(url: &str) -> Result<Self, redis::RedisError> {
        Ok(Self::new(redis::Client::open(url)?))
    }

    async fn round_trip(&self) -> Result<(), ProbeError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(failed)?;

        conn.set_ex::<_, _, ()>(PROBE_KEY, PROBE_VALUE, PROBE_TTL_SECS)
            .await
            .map_err(failed)?;

        let value: Option<String> = conn.get(PROBE_KEY).await.map_err(failed)?;
        verify_value(value.as_deref())
    }
}

fn failed(e: impl std::fmt::Display) -> ProbeError {
    ProbeError::failed(format!("Redis connection failed: {}", e))
}

/// 读回的值必须与写入的一致
fn verify_value(value: Option<&str>) -> Result<(), ProbeError> {
    match value {
        Some(PROBE_VALUE) => Ok(()),
        _ => Err(failed("Redis value mismatch")),
    }
}

#[async_trait]
impl DependencyCheck for CacheCheck {
    fn name(&self) -> &str {
        CACHE_CHECK
    }

    async fn check(&self) -> Result<String, ProbeError> {
        self.round_trip().await?;
        Ok("Redis connection successful".to_string())
    }
}
