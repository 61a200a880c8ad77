//! 应用层：状态与路由

pub mod product;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::{
    config::Environment, middleware::request_logging_middleware, response::HealthResponse,
};
use product::service::ProductService;

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    /// 开发环境下 500 响应带详细错误信息
    pub environment: Environment,
}

impl AppState {
    pub fn new(product_service: ProductService, environment: Environment) -> Self {
        Self {
            product_service,
            environment,
        }
    }
}

/// 创建路由
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/products",
            get(product::handler::list_products).post(product::handler::create_product),
        )
        .route("/products/:id", get(product::handler::get_product))
        .with_state(state)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.environment.to_string()))
}
