// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{AdminSession, Claims},
};

/// Login de credencial única: o administrador configurado no ambiente.
#[derive(Clone)]
pub struct AuthService {
    admin_email: String,
    admin_password_hash: String,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(admin_email: String, admin_password_hash: String, jwt_secret: String) -> Self {
        Self {
            admin_email,
            admin_password_hash,
            jwt_secret,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        if !email.trim().eq_ignore_ascii_case(&self.admin_email) {
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = self.admin_password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("🔑 Login do administrador {}", self.admin_email);
        self.create_token()
    }

    pub fn validate_token(&self, token: &str) -> Result<AdminSession, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        if token_data.claims.sub != self.admin_email {
            return Err(AppError::InvalidToken);
        }

        Ok(AdminSession {
            email: token_data.claims.sub,
        })
    }

    fn create_token(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: self.admin_email.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        // custo mínimo para o teste não demorar
        let hash = bcrypt::hash("segredo123", 4).unwrap();
        AuthService::new("admin@loja.com".into(), hash, "chave-de-teste".into())
    }

    #[tokio::test]
    async fn login_issues_token_that_validates() {
        let auth = service();
        let token = auth.login("Admin@Loja.com", "segredo123").await.unwrap();

        let session = auth.validate_token(&token).unwrap();
        assert_eq!(session.email, "admin@loja.com");
    }

    #[tokio::test]
    async fn wrong_credentials_are_rejected() {
        let auth = service();
        assert!(matches!(
            auth.login("admin@loja.com", "errada").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("outro@loja.com", "segredo123").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.validate_token("nao.e.jwt"),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn token_from_other_secret_is_invalid() {
        let other = AuthService::new("admin@loja.com".into(), String::new(), "outra".into());
        let token = other.create_token().unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(AppError::InvalidToken)
        ));
    }
}
