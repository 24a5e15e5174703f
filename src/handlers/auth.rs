// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedAdmin,
    models::auth::{AdminSession, AuthResponse, LoginPayload},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(AuthResponse { token }))))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão atual", body = ApiResponse<AdminSession>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(admin: AuthenticatedAdmin) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(ApiResponse::ok(admin.0))))
}
