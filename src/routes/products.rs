use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateProductRequest, DeleteProductQuery, Product, ProductChanges, ProductListQuery},
    services::{catalog::CompanyFilter, product_validation},
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.store.list_products().await?;
    let filter = CompanyFilter::from_query(params.company.as_deref());

    Ok(Json(filter.apply(products)))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let row = product_validation::validate_new_product(&payload)?;
    let product = state.store.insert_product(&row).await?;

    tracing::info!("Product {} ({}) added", product.name, product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductChanges>,
) -> Result<Json<Product>> {
    let changes = product_validation::validate_changes(&payload)?;

    let product = state
        .store
        .update_product(id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteProductQuery>,
) -> Result<StatusCode> {
    if !params.confirm {
        return Err(AppError::BadRequest(
            "Deleting a product cannot be undone; repeat the request with confirm=true".to_string(),
        ));
    }

    if state.store.delete_product(id).await? == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    tracing::info!("Product {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}
