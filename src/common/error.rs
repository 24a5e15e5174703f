// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::common::response::ApiResponse;

// Erro único da aplicação. Todas as camadas (stores, services, handlers) falam esta língua.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validações manuais feitas no ponto de chamada (ex: valor de aprovação)
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} não encontrado(a)")]
    NotFound(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Falhas do armazenamento local (arquivo ilegível, JSON corrompido...)
    #[error("Erro no armazenamento local: {0}")]
    StorageError(String),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem legível que vai no campo `error` do envelope.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(errors) => {
                let mut messages: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, field_errors)| {
                        field_errors.iter().map(move |e| match &e.message {
                            Some(m) => format!("{}: {}", field, m),
                            None => format!("{}: {}", field, e.code),
                        })
                    })
                    .collect();
                messages.sort();
                format!("Um ou mais campos são inválidos. {}", messages.join("; "))
            }
            AppError::InvalidInput(_) | AppError::NotFound(_) => self.to_string(),
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),
            // Falhas de backend: o chamador só precisa saber que a operação falhou
            e => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let body = Json(ApiResponse::<()>::failure(self.public_message()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "O nome é obrigatório."))]
        name: String,
    }

    async fn envelope(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_is_404_with_failure_envelope() {
        let (status, body) = envelope(AppError::not_found("Orçamento")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"], "Orçamento não encontrado(a)");
    }

    #[tokio::test]
    async fn validation_errors_are_400_and_name_the_field() {
        let errors = Payload { name: String::new() }.validate().unwrap_err();
        let (status, body) = envelope(errors.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert!(body["error"].as_str().unwrap().contains("name: O nome é obrigatório."));
    }

    #[tokio::test]
    async fn invalid_input_keeps_its_message() {
        let (status, body) = envelope(AppError::InvalidInput("Valor inválido.".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Valor inválido.");
    }

    #[tokio::test]
    async fn invalid_token_is_401() {
        let (status, body) = envelope(AppError::InvalidToken).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");
    }

    #[tokio::test]
    async fn storage_failures_are_500() {
        let (status, body) = envelope(AppError::StorageError("disco cheio".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }
}
