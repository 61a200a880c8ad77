//! 基础设施：缓存、数据库连接与日志

pub mod cache;
#[cfg(feature = "database")]
pub mod database;
pub mod logger;
