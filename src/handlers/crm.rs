// src/handlers/crm.rs

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
    models::crm::{Client, ClientHistory, NewClient},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Busca por nome, e-mail, WhatsApp ou documento
    pub q: Option<String>,
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = NewClient,
    responses(
        (status = 201, description = "Cliente cadastrado", body = ApiResponse<Client>),
        (status = 400, description = "Nome ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    Json(payload): Json<NewClient>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.create_client(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(client))))
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(SearchQuery),
    responses(
        (status = 200, description = "Clientes", body = ApiResponse<Vec<Client>>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state
        .client_service
        .list_clients(query.q.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(clients))))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = ApiResponse<Client>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.get_client(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(client))))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = String, Path, description = "ID do cliente")),
    request_body = Client,
    responses(
        (status = 200, description = "Cliente salvo", body = ApiResponse<Client>),
        (status = 400, description = "Nome ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<Client>,
) -> Result<impl IntoResponse, AppError> {
    payload.id = id;
    let client = app_state.client_service.save_client(&payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(client))))
}

// GET /api/clients/{id}/history
#[utoipa::path(
    get,
    path = "/api/clients/{id}/history",
    tag = "Clients",
    params(("id" = String, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Orçamentos e OS do cliente", body = ApiResponse<ClientHistory>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client_history(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state.client_service.history(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(history))))
}
