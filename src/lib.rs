//! # 商品目录服务
//!
//! 一个基于 Axum 的商品目录 CRUD 服务，包括：
//! - 商品列表、按 ID 查询、创建商品三个 HTTP 接口
//! - 仓储层：PostgreSQL (sqlx) 与进程内存储两种实现
//! - 带滑动/绝对过期的商品列表读穿缓存，写入后失效
//! - 配置加载、结构化日志与统一错误响应

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::product::{
    model::{CreateProductRequest, Product},
    repository::{InMemoryProductRepository, ProductRepository, StorageError},
    service::{ProductService, ServiceError},
};
pub use app::{router, AppState};
pub use crate::core::config::AppConfig;
pub use infrastructure::cache::{Cache, ExpiryPolicy, MemoryCache};
