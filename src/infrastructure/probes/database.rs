//! Database Probe
//!
//! 对主连接池执行一次 `SELECT 1` 往返
//!
//! 连接池以惰性方式创建：启动时不连接数据库，
//! 数据库宕机只会让就绪检查失败，不会阻止进程启动

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use crate::domain::probe::{DependencyCheck, ProbeError};

/// 数据库检查名称
pub const DATABASE_CHECK: &str = "database";

/// MySQL 连通性检查
pub struct DatabaseCheck {
    pool: MySqlPool,
}

impl DatabaseCheck {
    /// 使用已有连接池
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// 根据 URL 惰性创建连接池
    ///
    /// URL 格式错误会立即返回错误（启动期配置错误）
    pub fn connect_lazy(url: &str, acquire_timeout: Duration) -> Result<Self, sqlx::Error> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(url)?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DependencyCheck for DatabaseCheck {
    fn name(&self) -> &str {
        DATABASE_CHECK
    }

    async fn check(&self) -> Result<String, ProbeError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| "MySQL connection successful".to_string())
            .map_err(|e| ProbeError::failed(format!("Database connection failed: {}", e)))
    }
}
