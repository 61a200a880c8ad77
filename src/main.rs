use product_catalog::app::{router, AppState};
use product_catalog::core::config::AppConfig;
use product_catalog::infrastructure::cache::MemoryCache;
use product_catalog::infrastructure::logger::Logger;
use product_catalog::{InMemoryProductRepository, ProductRepository, ProductService};
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 第一个参数为配置文件路径（可选）
    let args: Vec<String> = env::args().collect();
    let config = AppConfig::load(args.get(1).map(String::as_str))?;

    Logger::init(&config.logging);
    info!(environment = %config.environment, "starting product catalog service");

    let repository = build_repository(&config).await?;
    let product_service = ProductService::new(
        repository,
        Arc::new(MemoryCache::new()),
        config.cache.expiry_policy(),
    );
    let state = AppState::new(product_service, config.environment);
    let app = router(state, config.server.timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("product catalog listening on http://{}", listener.local_addr()?);
    info!("   GET    /health         - Health check");
    info!("   GET    /products       - List products");
    info!("   POST   /products       - Create product");
    info!("   GET    /products/:id   - Get product by ID");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("product catalog stopped");
    Ok(())
}

#[cfg(feature = "database")]
async fn build_repository(
    config: &AppConfig,
) -> Result<Arc<dyn ProductRepository>, Box<dyn std::error::Error>> {
    use product_catalog::app::product::repository::PgProductRepository;
    use product_catalog::infrastructure::database::DatabaseManager;

    match &config.database.url {
        Some(url) => {
            let database = DatabaseManager::new(url, &config.database).await?;
            database.migrate().await?;
            Ok(Arc::new(PgProductRepository::new(database.get_pool().clone())))
        }
        None => {
            warn!("no database url configured, using in-memory store");
            Ok(Arc::new(InMemoryProductRepository::new()))
        }
    }
}

#[cfg(not(feature = "database"))]
async fn build_repository(
    config: &AppConfig,
) -> Result<Arc<dyn ProductRepository>, Box<dyn std::error::Error>> {
    if config.database.url.is_some() {
        warn!("built without the `database` feature, ignoring database url");
    }
    Ok(Arc::new(InMemoryProductRepository::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
