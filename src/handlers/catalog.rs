// src/handlers/catalog.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::catalog::{ServiceCatalogItem, ServiceCategory},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilter {
    pub category: Option<ServiceCategory>,
    #[serde(default)]
    pub active_only: bool,
}

// GET /api/service-catalog
#[utoipa::path(
    get,
    path = "/api/service-catalog",
    tag = "Service Catalog",
    params(CatalogFilter),
    responses(
        (status = 200, description = "Tabela de preços de serviços", body = ApiResponse<Vec<ServiceCatalogItem>>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_catalog(
    State(app_state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state
        .catalog_service
        .list_catalog(filter.category, filter.active_only)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(items))))
}

// PUT /api/service-catalog
#[utoipa::path(
    put,
    path = "/api/service-catalog",
    tag = "Service Catalog",
    request_body = ServiceCatalogItem,
    responses(
        (status = 200, description = "Item gravado (pelo código)", body = ApiResponse<ServiceCatalogItem>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_catalog_item(
    State(app_state): State<AppState>,
    Json(payload): Json<ServiceCatalogItem>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.catalog_service.save_item(payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(item))))
}
