// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::inventory::{NewProduct, Product, StockAdjustmentPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductQuery {
    /// Código de barras ou parte da descrição
    pub q: Option<String>,
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Inventory",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Produto cadastrado", body = ApiResponse<Product>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Inventory",
    params(ProductQuery),
    responses(
        (status = 200, description = "Produtos", body = ApiResponse<Vec<Product>>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .inventory_service
        .list_products(query.q.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(products))))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = String, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = ApiResponse<Product>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.get_product(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(product))))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = String, Path, description = "ID do produto")),
    request_body = Product,
    responses(
        (status = 200, description = "Produto salvo", body = ApiResponse<Product>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<Product>,
) -> Result<impl IntoResponse, AppError> {
    payload.id = id;
    let product = app_state.inventory_service.save_product(&payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(product))))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = String, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido (devolve o id)", body = ApiResponse<String>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete_product(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(id))))
}

// POST /api/products/{id}/stock
#[utoipa::path(
    post,
    path = "/api/products/{id}/stock",
    tag = "Inventory",
    params(("id" = String, Path, description = "ID do produto")),
    request_body = StockAdjustmentPayload,
    responses(
        (status = 200, description = "Estoque ajustado", body = ApiResponse<Product>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn adjust_stock(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StockAdjustmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .inventory_service
        .adjust_stock(&id, payload.delta)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(product))))
}
