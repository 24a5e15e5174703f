// src/db/settings_repo.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::{
    common::error::AppError,
    db::storage::SettingsStorage,
    models::settings::Settings,
};

// Formato da tabela 'settings' (linha única, id = 1)
#[derive(Debug, FromRow)]
struct SettingsRow {
    company_name: String,
    cnpj: String,
    phone: String,
    email: String,
    address: String,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Self {
            company_name: row.company_name,
            cnpj: row.cnpj,
            phone: row.phone,
            email: row.email,
            address: row.address,
        }
    }
}

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStorage for SettingsRepository {
    async fn get_settings(&self) -> Result<Settings, AppError> {
        // Se a linha ainda não existe, cria com os padrões (vazios) e devolve.
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            INSERT INTO settings (id) VALUES (1)
            ON CONFLICT (id) DO UPDATE SET id = settings.id
            RETURNING company_name, cnpj, phone, email, address
            "#,
        )
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<Settings, AppError> {
        // UPSERT (Insert or Update)
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            INSERT INTO settings (id, company_name, cnpj, phone, email, address)
            VALUES (1, $1, $2, $3, $4, $5)
            ON CONFLICT (id)
            DO UPDATE SET
                company_name = EXCLUDED.company_name,
                cnpj = EXCLUDED.cnpj,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                address = EXCLUDED.address,
                updated_at = NOW()
            RETURNING company_name, cnpj, phone, email, address
            "#,
        )
            .bind(&settings.company_name)
            .bind(&settings.cnpj)
            .bind(&settings.phone)
            .bind(&settings.email)
            .bind(&settings.address)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }
}
