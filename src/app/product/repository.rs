//! 商品仓储
//!
//! 把存储的查询接口收敛成三个操作：查询全部、按 ID 查询、插入。

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::model::Product;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[cfg(feature = "database")]
    #[error("database error")]
    Database(#[source] sqlx::Error),
    #[error("constraint violation: {0}")]
    Constraint(String),
    /// 存储暂不可用（连接中断、超时等），与约束冲突区分
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            use sqlx::error::ErrorKind;
            if !matches!(db_err.kind(), ErrorKind::Other) {
                let constraint = db_err
                    .constraint()
                    .map(|name| format!("{} ({})", db_err.message(), name))
                    .unwrap_or_else(|| db_err.message().to_string());
                return StorageError::Constraint(constraint);
            }
        }
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StorageError::Unavailable(err.to_string())
            }
            err => StorageError::Database(err),
        }
    }
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 按存储自身的顺序返回全部商品
    async fn fetch_all(&self) -> Result<Vec<Product>, StorageError>;

    /// 不存在时返回 `None`
    async fn fetch_by_id(&self, id: i32) -> Result<Option<Product>, StorageError>;

    /// 持久化商品，成功后回填 `product.id`
    async fn insert(&self, product: &mut Product) -> Result<(), StorageError>;
}

/// 进程内存储，未配置数据库时使用
#[derive(Default)]
pub struct InMemoryProductRepository {
    state: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    rows: BTreeMap<i32, Product>,
    last_id: i32,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置数据，ID 按顺序分配
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let repository = Self::new();
        {
            let mut state = repository.lock();
            for mut product in products {
                state.last_id += 1;
                product.id = state.last_id;
                state.rows.insert(product.id, product);
            }
        }
        repository
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn fetch_all(&self) -> Result<Vec<Product>, StorageError> {
        Ok(self.lock().rows.values().cloned().collect())
    }

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Product>, StorageError> {
        Ok(self.lock().rows.get(&id).cloned())
    }

    async fn insert(&self, product: &mut Product) -> Result<(), StorageError> {
        let mut state = self.lock();
        state.last_id += 1;
        product.id = state.last_id;
        state.rows.insert(product.id, product.clone());
        Ok(())
    }
}

#[cfg(feature = "database")]
pub use postgres::PgProductRepository;

#[cfg(feature = "database")]
mod postgres {
    use async_trait::async_trait;
    use sqlx::postgres::PgPool;

    use super::{Product, ProductRepository, StorageError};

    /// PostgreSQL 仓储
    #[derive(Clone)]
    pub struct PgProductRepository {
        pool: PgPool,
    }

    impl PgProductRepository {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }
    }

    #[async_trait]
    impl ProductRepository for PgProductRepository {
        async fn fetch_all(&self) -> Result<Vec<Product>, StorageError> {
            let products = sqlx::query_as::<_, Product>(
                "SELECT id, name, description, price FROM products",
            )
            .fetch_all(&self.pool)
            .await?;

            Ok(products)
        }

        async fn fetch_by_id(&self, id: i32) -> Result<Option<Product>, StorageError> {
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, name, description, price FROM products WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(product)
        }

        async fn insert(&self, product: &mut Product) -> Result<(), StorageError> {
            // 回填存储后的整行，价格以列精度为准
            let stored = sqlx::query_as::<_, Product>(
                "INSERT INTO products (name, description, price) VALUES ($1, $2, $3) \
                 RETURNING id, name, description, price",
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .fetch_one(&self.pool)
            .await?;

            *product = stored;
            Ok(())
        }
    }
}
