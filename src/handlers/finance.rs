// src/handlers/finance.rs

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
    models::finance::{CashFlowStats, NewTransaction, Transaction, TransactionType},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionFilter {
    /// income | expense
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

// POST /api/transactions
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Finance",
    request_body = NewTransaction,
    responses(
        (status = 201, description = "Lançamento registrado", body = ApiResponse<Transaction>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    Json(payload): Json<NewTransaction>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = app_state.finance_service.create_transaction(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(transaction))))
}

// GET /api/transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Finance",
    params(TransactionFilter),
    responses(
        (status = 200, description = "Lançamentos", body = ApiResponse<Vec<Transaction>>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = app_state
        .finance_service
        .list_transactions(filter.transaction_type)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(transactions))))
}

// GET /api/transactions/cash-flow
#[utoipa::path(
    get,
    path = "/api/transactions/cash-flow",
    tag = "Finance",
    responses(
        (status = 200, description = "Saldo e movimento do mês", body = ApiResponse<CashFlowStats>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cash_flow(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.finance_service.cash_flow().await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(stats))))
}
