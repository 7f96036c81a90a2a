//! Dependency Probes
//!
//! 具体的依赖检查实现：
//! - `database` - MySQL（sqlx）
//! - `cache` - Redis

pub mod cache;
pub mod database;

pub use cache::{CacheCheck, CACHE_CHECK};
pub use database::{DatabaseCheck, DATABASE_CHECK};
