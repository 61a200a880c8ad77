//! 商品业务服务
//!
//! 商品列表走读穿缓存：命中直接返回快照，未命中读仓储后写入缓存；
//! 新增商品成功后失效缓存。按 ID 查询不经过缓存。

use std::sync::Arc;
use tracing::{debug, error, info};

use super::model::Product;
use super::repository::{ProductRepository, StorageError};
use crate::infrastructure::cache::{Cache, ExpiryPolicy};

/// 商品列表的缓存键
pub const PRODUCTS_CACHE_KEY: &str = "products:all";

pub type ProductListCache = dyn Cache<Arc<Vec<Product>>>;

/// 服务层错误，只携带通用描述，原始错误作为 source 保留
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{context}")]
    Retrieval {
        context: &'static str,
        #[source]
        source: StorageError,
    },
    #[error("{context}")]
    Persistence {
        context: &'static str,
        #[source]
        source: StorageError,
    },
}

impl ServiceError {
    /// 面向调用方的通用描述
    pub fn context(&self) -> &'static str {
        match self {
            ServiceError::Retrieval { context, .. } | ServiceError::Persistence { context, .. } => {
                context
            }
        }
    }
}

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    cache: Arc<ProductListCache>,
    policy: ExpiryPolicy,
}

impl ProductService {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        cache: Arc<ProductListCache>,
        policy: ExpiryPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            policy,
        }
    }

    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, ServiceError> {
        if let Some(products) = self.cache.get(PRODUCTS_CACHE_KEY) {
            debug!(count = products.len(), "product list served from cache");
            return Ok(products);
        }

        let products = self.repository.fetch_all().await.map_err(|source| {
            error!(error = ?source, "failed to fetch product list");
            ServiceError::Retrieval {
                context: "An error occurred while retrieving products.",
                source,
            }
        })?;

        let products = Arc::new(products);
        self.cache
            .set(PRODUCTS_CACHE_KEY, Arc::clone(&products), self.policy);
        debug!(count = products.len(), "product list cached");

        Ok(products)
    }

    pub async fn get_product(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        self.repository.fetch_by_id(id).await.map_err(|source| {
            error!(product_id = id, error = ?source, "failed to fetch product");
            ServiceError::Retrieval {
                context: "An error occurred while retrieving the product.",
                source,
            }
        })
    }

    /// 调用方负责校验；成功后失效商品列表缓存
    pub async fn add_product(&self, mut product: Product) -> Result<Product, ServiceError> {
        if let Err(source) = self.repository.insert(&mut product).await {
            error!(product = ?product, error = ?source, "failed to add product");
            return Err(ServiceError::Persistence {
                context: "An error occurred while adding the product.",
                source,
            });
        }

        self.cache.invalidate(PRODUCTS_CACHE_KEY);
        info!(product_id = product.id, name = %product.name, "product added");

        Ok(product)
    }
}
