// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::AdminSession};

// Protege as rotas administrativas: exige "Authorization: Bearer <jwt>"
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let session = app_state.auth_service.validate_token(bearer.token())?;

    // Insere a sessão nos "extensions" da requisição
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

// Extrator para obter o administrador autenticado diretamente nos handlers
pub struct AuthenticatedAdmin(pub AdminSession);

impl<S> FromRequestParts<S> for AuthenticatedAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .map(AuthenticatedAdmin)
            .ok_or(AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::response::ApiResponse;
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn me(AuthenticatedAdmin(session): AuthenticatedAdmin) -> impl IntoResponse {
        Json(ApiResponse::ok(session.email))
    }

    fn app() -> (Router, AppState) {
        let state = AppState::for_tests();
        let router = Router::new()
            .route("/api/eu", get(me))
            .route_layer(from_fn_with_state(state.clone(), auth_guard))
            .with_state(state.clone());
        (router, state)
    }

    async fn call(router: Router, authorization: Option<String>) -> (StatusCode, Value) {
        let mut request = HttpRequest::builder().uri("/api/eu").method("GET");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_bearer_is_rejected_with_envelope() {
        let (router, _) = app();
        let (status, body) = call(router, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let (router, _) = app();
        let (status, body) = call(router, Some("Bearer nao-e-um-jwt".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn valid_token_reaches_the_handler() {
        let (router, state) = app();
        let token = state
            .auth_service
            .login("admin@loja.com", "segredo123")
            .await
            .unwrap();

        let (status, body) = call(router, Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "admin@loja.com");
        assert!(body["error"].is_null());
    }
}
