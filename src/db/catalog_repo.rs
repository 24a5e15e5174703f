// src/db/catalog_repo.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::error::AppError,
    db::storage::ServiceCatalogStorage,
    models::catalog::{ServiceCatalogItem, ServiceCategory},
};

#[derive(Debug, FromRow)]
struct CatalogRow {
    id: String,
    code: String,
    category: ServiceCategory,
    description: String,
    value: Decimal,
    cost: Option<Decimal>,
    active: bool,
}

impl From<CatalogRow> for ServiceCatalogItem {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: Some(row.id),
            code: row.code,
            category: row.category,
            description: row.description,
            value: row.value,
            cost: row.cost,
            active: row.active,
        }
    }
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_item<'e, E>(
        &self,
        executor: E,
        item: &ServiceCatalogItem,
    ) -> Result<ServiceCatalogItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, CatalogRow>(
            r#"
            INSERT INTO service_catalog (code, category, description, value, cost, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (code) DO UPDATE SET
                category = EXCLUDED.category,
                description = EXCLUDED.description,
                value = EXCLUDED.value,
                cost = EXCLUDED.cost,
                active = EXCLUDED.active
            RETURNING *
            "#,
        )
            .bind(&item.code)
            .bind(item.category)
            .bind(&item.description)
            .bind(item.value)
            .bind(item.cost)
            .bind(item.active)
            .fetch_one(executor)
            .await?;

        Ok(row.into())
    }
}

#[async_trait]
impl ServiceCatalogStorage for CatalogRepository {
    async fn list_catalog(&self) -> Result<Vec<ServiceCatalogItem>, AppError> {
        let rows = sqlx::query_as::<_, CatalogRow>(
            "SELECT * FROM service_catalog ORDER BY category ASC, code ASC",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_catalog_item(
        &self,
        item: ServiceCatalogItem,
    ) -> Result<ServiceCatalogItem, AppError> {
        self.upsert_item(&self.pool, &item).await
    }

    async fn seed_catalog(&self, items: Vec<ServiceCatalogItem>) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM service_catalog")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        for item in &items {
            self.upsert_item(&mut *tx, item).await?;
        }

        tx.commit().await?;
        Ok(items.len())
    }
}
