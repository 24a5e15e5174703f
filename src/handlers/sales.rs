// src/handlers/sales.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::sales::{NewSale, Sale, SaleReceipt},
};

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = NewSale,
    responses(
        (status = 201, description = "Venda registrada, estoque baixado e entrada lançada", body = ApiResponse<SaleReceipt>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<NewSale>,
) -> Result<impl IntoResponse, AppError> {
    let (sale, transaction) = app_state.sales_service.create_sale(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SaleReceipt { sale, transaction })),
    ))
}

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    responses(
        (status = 200, description = "Vendas", body = ApiResponse<Vec<Sale>>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sales_service.list_sales().await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(sales))))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = String, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda", body = ApiResponse<Sale>),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sales_service.get_sale(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(sale))))
}
