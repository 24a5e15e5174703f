// src/handlers/settings.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::settings::Settings,
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Dados da empresa", body = ApiResponse<Settings>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state.repos.settings.get_settings().await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(settings))))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = Settings,
    responses(
        (status = 200, description = "Configurações salvas", body = ApiResponse<Settings>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    Json(payload): Json<Settings>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.repos.settings.save_settings(&payload).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(updated))))
}
