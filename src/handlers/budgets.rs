// src/handlers/budgets.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::{
        budget::{
            ApproveBudgetPayload, BudgetIncome, BudgetRequest, ConvertBudgetPayload, NewBudget,
        },
        service_order::ServiceOrder,
    },
};

// POST /api/budgets (público: formulário do site)
#[utoipa::path(
    post,
    path = "/api/budgets",
    tag = "Budgets",
    request_body = NewBudget,
    responses(
        (status = 201, description = "Pedido de orçamento recebido", body = ApiResponse<BudgetRequest>),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_budget(
    State(app_state): State<AppState>,
    Json(payload): Json<NewBudget>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state.budget_service.create_budget(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(budget))))
}

// GET /api/budgets
#[utoipa::path(
    get,
    path = "/api/budgets",
    tag = "Budgets",
    responses(
        (status = 200, description = "Orçamentos, mais recentes primeiro", body = ApiResponse<Vec<BudgetRequest>>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_budgets(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let budgets = app_state.budget_service.list_budgets().await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(budgets))))
}

// GET /api/budgets/{id}
#[utoipa::path(
    get,
    path = "/api/budgets/{id}",
    tag = "Budgets",
    params(("id" = String, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento", body = ApiResponse<BudgetRequest>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_budget(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state.budget_service.get_budget(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(budget))))
}

// PUT /api/budgets/{id}
#[utoipa::path(
    put,
    path = "/api/budgets/{id}",
    tag = "Budgets",
    params(("id" = String, Path, description = "ID do orçamento")),
    request_body = BudgetRequest,
    responses(
        (status = 200, description = "Orçamento salvo", body = ApiResponse<BudgetRequest>)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_budget(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<BudgetRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.id = id;
    let budget = app_state.budget_service.save_budget(&payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(budget))))
}

// POST /api/budgets/{id}/approve
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/approve",
    tag = "Budgets",
    params(("id" = String, Path, description = "ID do orçamento")),
    request_body = ApproveBudgetPayload,
    responses(
        (status = 200, description = "Orçamento aprovado", body = ApiResponse<BudgetRequest>),
        (status = 400, description = "Valor aprovado ausente"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_budget(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ApproveBudgetPayload>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state
        .budget_service
        .approve(&id, payload.approved_value)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(budget))))
}

// POST /api/budgets/{id}/reject
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/reject",
    tag = "Budgets",
    params(("id" = String, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento recusado", body = ApiResponse<BudgetRequest>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_budget(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let budget = app_state.budget_service.reject(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(budget))))
}

// POST /api/budgets/{id}/service-order
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/service-order",
    tag = "Budgets",
    params(("id" = String, Path, description = "ID do orçamento")),
    request_body = ConvertBudgetPayload,
    responses(
        (status = 201, description = "OS aberta a partir do orçamento", body = ApiResponse<ServiceOrder>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_to_service_order(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ConvertBudgetPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .budget_service
        .convert_to_service_order(&id, payload.technician)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

// POST /api/budgets/{id}/income
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/income",
    tag = "Budgets",
    params(("id" = String, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento concluído e receita lançada", body = ApiResponse<BudgetIncome>),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_to_income(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state.budget_service.convert_to_income(&id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(result))))
}
