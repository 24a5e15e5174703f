// src/db/crm_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    common::error::AppError,
    db::storage::ClientStorage,
    models::crm::{Client, NewClient},
};

#[derive(Debug, FromRow)]
struct ClientRow {
    id: String,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    whatsapp: String,
    cpf_cnpj: String,
    address: String,
    notes: String,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            name: row.name,
            email: row.email,
            whatsapp: row.whatsapp,
            cpf_or_cnpj: row.cpf_cnpj,
            address: row.address,
            notes: row.notes,
        }
    }
}

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStorage for ClientRepository {
    async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        let rows = sqlx::query_as::<_, ClientRow>(
            "SELECT * FROM clients ORDER BY created_at DESC",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_client(&self, id: &str) -> Result<Option<Client>, AppError> {
        let row = sqlx::query_as::<_, ClientRow>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create_client(&self, new: NewClient) -> Result<Client, AppError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO clients (name, email, whatsapp, cpf_cnpj, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.whatsapp)
            .bind(&new.cpf_or_cnpj)
            .bind(&new.address)
            .bind(&new.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn save_client(&self, client: &Client) -> Result<Client, AppError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO clients (id, created_at, name, email, whatsapp, cpf_cnpj, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                whatsapp = EXCLUDED.whatsapp,
                cpf_cnpj = EXCLUDED.cpf_cnpj,
                address = EXCLUDED.address,
                notes = EXCLUDED.notes
            RETURNING *
            "#,
        )
            .bind(&client.id)
            .bind(client.created_at)
            .bind(&client.name)
            .bind(&client.email)
            .bind(&client.whatsapp)
            .bind(&client.cpf_or_cnpj)
            .bind(&client.address)
            .bind(&client.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }
}
