// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Dados para login do administrador
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (e-mail do administrador)
    pub exp: usize,  // Expiration time
    pub iat: usize,  // Issued At
}

/// Sessão autenticada, inserida nas extensions da requisição pelo guard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminSession {
    pub email: String,
}
