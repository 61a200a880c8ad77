#![allow(dead_code)]

use async_trait::async_trait;
use product_catalog::{
    Cache, ExpiryPolicy, InMemoryProductRepository, MemoryCache, Product, ProductRepository,
    ProductService, StorageError,
};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// 记录调用次数、可按操作注入失败的仓储
#[derive(Default)]
pub struct TestRepository {
    inner: InMemoryProductRepository,
    pub fetch_all_calls: AtomicUsize,
    pub fetch_by_id_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_inserts: AtomicBool,
}

impl TestRepository {
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            inner: InMemoryProductRepository::with_products(products),
            ..Self::default()
        }
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    fn failure() -> StorageError {
        StorageError::Unavailable("connection reset by peer".to_string())
    }
}

#[async_trait]
impl ProductRepository for TestRepository {
    async fn fetch_all(&self) -> Result<Vec<Product>, StorageError> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        self.inner.fetch_all().await
    }

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Product>, StorageError> {
        self.fetch_by_id_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        self.inner.fetch_by_id(id).await
    }

    async fn insert(&self, product: &mut Product) -> Result<(), StorageError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(Self::failure());
        }
        self.inner.insert(product).await
    }
}

pub fn product(name: &str, cents: i64) -> Product {
    Product {
        id: 0,
        name: name.to_string(),
        description: Some(format!("Description of {}", name)),
        price: Decimal::new(cents, 2),
    }
}

/// 预置 "Product 1" / "Product 2"（ID 1、2）
pub fn seeded_repository() -> Arc<TestRepository> {
    Arc::new(TestRepository::with_products([
        product("Product 1", 1000),
        product("Product 2", 1500),
    ]))
}

pub fn service_with(
    repository: Arc<TestRepository>,
) -> (ProductService, Arc<MemoryCache<Arc<Vec<Product>>>>) {
    service_with_policy(repository, ExpiryPolicy::default())
}

pub fn service_with_policy(
    repository: Arc<TestRepository>,
    policy: ExpiryPolicy,
) -> (ProductService, Arc<MemoryCache<Arc<Vec<Product>>>>) {
    let cache = Arc::new(MemoryCache::new());
    let service = ProductService::new(repository, cache.clone(), policy);
    (service, cache)
}

pub fn is_cached(cache: &MemoryCache<Arc<Vec<Product>>>) -> bool {
    cache
        .get(product_catalog::app::product::service::PRODUCTS_CACHE_KEY)
        .is_some()
}
