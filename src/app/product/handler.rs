//! 商品处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::warn;
use validator::Validate;

use super::model::{CreateProductRequest, Product};
use super::service::ServiceError;
use crate::app::AppState;
use crate::core::{error::CoreError, response::Created};

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state
        .product_service
        .list_products()
        .await
        .map_err(|err| internal_error(&state, err))?;

    Ok(Json(products.as_ref().clone()))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, CoreError> {
    let product = state
        .product_service
        .get_product(id)
        .await
        .map_err(|err| internal_error(&state, err))?;

    product
        .map(Json)
        .ok_or_else(|| CoreError::NotFound(format!("Product with ID {} not found.", id)))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Created<Product>, CoreError> {
    let Json(payload) = payload?;

    if let Err(errors) = payload.validate() {
        warn!(?errors, "rejected invalid product");
        return Err(errors.into());
    }

    let product = state
        .product_service
        .add_product(payload.into_product())
        .await
        .map_err(|err| internal_error(&state, err))?;

    Ok(Created::new(format!("/products/{}", product.id), product))
}

fn internal_error(state: &AppState, err: ServiceError) -> CoreError {
    CoreError::internal(err.context(), &err, state.environment.is_development())
}
