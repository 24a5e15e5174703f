// src/handlers/service_orders.rs

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
    models::service_order::{
        AddProductPayload, AddServicePayload, NewServiceOrder, ServiceOrder, SetDiscountPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderFilter {
    /// Só as OS do cliente com este e-mail
    pub email: Option<String>,
}

// POST /api/service-orders
#[utoipa::path(
    post,
    path = "/api/service-orders",
    tag = "Service Orders",
    request_body = NewServiceOrder,
    responses(
        (status = 201, description = "OS aberta", body = ApiResponse<ServiceOrder>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    Json(payload): Json<NewServiceOrder>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.service_order_service.create_order(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

// GET /api/service-orders
#[utoipa::path(
    get,
    path = "/api/service-orders",
    tag = "Service Orders",
    params(OrderFilter),
    responses(
        (status = 200, description = "Ordens de serviço", body = ApiResponse<Vec<ServiceOrder>>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state
        .service_order_service
        .list_orders(filter.email.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(orders))))
}

// GET /api/service-orders/{id}
#[utoipa::path(
    get,
    path = "/api/service-orders/{id}",
    tag = "Service Orders",
    params(("id" = String, Path, description = "ID da OS")),
    responses(
        (status = 200, description = "OS", body = ApiResponse<ServiceOrder>),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.service_order_service.get_order(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(order))))
}

// PUT /api/service-orders/{id}
#[utoipa::path(
    put,
    path = "/api/service-orders/{id}",
    tag = "Service Orders",
    params(("id" = String, Path, description = "ID da OS")),
    request_body = ServiceOrder,
    responses(
        (status = 200, description = "OS salva (total recalculado)", body = ApiResponse<ServiceOrder>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<ServiceOrder>,
) -> Result<impl IntoResponse, AppError> {
    payload.id = id;
    let order = app_state.service_order_service.save_order(payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(order))))
}

// POST /api/service-orders/{id}/services
#[utoipa::path(
    post,
    path = "/api/service-orders/{id}/services",
    tag = "Service Orders",
    params(("id" = String, Path, description = "ID da OS")),
    request_body = AddServicePayload,
    responses(
        (status = 200, description = "Serviço incluído", body = ApiResponse<ServiceOrder>),
        (status = 404, description = "OS não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_service(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AddServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.service_order_service.add_service(&id, payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(order))))
}

// DELETE /api/service-orders/{id}/services/{line_id}
#[utoipa::path(
    delete,
    path = "/api/service-orders/{id}/services/{line_id}",
    tag = "Service Orders",
    params(
        ("id" = String, Path, description = "ID da OS"),
        ("line_id" = String, Path, description = "ID da linha de serviço")
    ),
    responses(
        (status = 200, description = "Serviço removido", body = ApiResponse<ServiceOrder>),
        (status = 404, description = "OS ou linha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_service(
    State(app_state): State<AppState>,
    Path((id, line_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .service_order_service
        .remove_service(&id, &line_id)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(order))))
}

// POST /api/service-orders/{id}/products
#[utoipa::path(
    post,
    path = "/api/service-orders/{id}/products",
    tag = "Service Orders",
    params(("id" = String, Path, description = "ID da OS")),
    request_body = AddProductPayload,
    responses(
        (status = 200, description = "Produto incluído", body = ApiResponse<ServiceOrder>),
        (status = 404, description = "OS ou produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_product(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AddProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.service_order_service.add_product(&id, payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(order))))
}

// DELETE /api/service-orders/{id}/products/{line_id}
#[utoipa::path(
    delete,
    path = "/api/service-orders/{id}/products/{line_id}",
    tag = "Service Orders",
    params(
        ("id" = String, Path, description = "ID da OS"),
        ("line_id" = String, Path, description = "ID da linha de produto")
    ),
    responses(
        (status = 200, description = "Produto removido", body = ApiResponse<ServiceOrder>),
        (status = 404, description = "OS ou linha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_product(
    State(app_state): State<AppState>,
    Path((id, line_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .service_order_service
        .remove_product(&id, &line_id)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(order))))
}

// PUT /api/service-orders/{id}/discount
#[utoipa::path(
    put,
    path = "/api/service-orders/{id}/discount",
    tag = "Service Orders",
    params(("id" = String, Path, description = "ID da OS")),
    request_body = SetDiscountPayload,
    responses(
        (status = 200, description = "Desconto aplicado", body = ApiResponse<ServiceOrder>),
        (status = 400, description = "Desconto negativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_discount(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SetDiscountPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.service_order_service.set_discount(&id, payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(order))))
}
