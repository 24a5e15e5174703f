// src/db/inventory_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::error::AppError,
    db::storage::ProductStorage,
    models::inventory::{NewProduct, Product},
};

#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    barcode: String,
    description: String,
    purchase_price: Decimal,
    resale_price: Decimal,
    stock_quantity: i32,
    image_url: String,
    supplier: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            barcode: row.barcode,
            description: row.description,
            purchase_price: row.purchase_price,
            resale_price: row.resale_price,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
            supplier: row.supplier,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Soma `delta` ao estoque. Aceita qualquer executor para rodar dentro da transação da venda.
    pub async fn update_stock_quantity<'e, E>(
        &self,
        executor: E,
        product_id: &str,
        delta: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(product_id)
            .bind(delta)
            .fetch_optional(executor)
            .await?;

        if let Some(row) = &row {
            if row.stock_quantity < 0 {
                tracing::warn!(
                    "⚠️ Estoque negativo no produto {} ({}): {}",
                    row.id,
                    row.description,
                    row.stock_quantity
                );
            }
        }

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl ProductStorage for InventoryRepository {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products ORDER BY created_at DESC",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (
                barcode, description, purchase_price, resale_price,
                stock_quantity, image_url, supplier
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(&new.barcode)
            .bind(&new.description)
            .bind(new.purchase_price)
            .bind(new.resale_price)
            .bind(new.stock_quantity)
            .bind(&new.image_url)
            .bind(&new.supplier)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn save_product(&self, product: &Product) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (
                id, barcode, description, purchase_price, resale_price,
                stock_quantity, image_url, supplier, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (id) DO UPDATE SET
                barcode = EXCLUDED.barcode,
                description = EXCLUDED.description,
                purchase_price = EXCLUDED.purchase_price,
                resale_price = EXCLUDED.resale_price,
                stock_quantity = EXCLUDED.stock_quantity,
                image_url = EXCLUDED.image_url,
                supplier = EXCLUDED.supplier,
                updated_at = NOW()
            RETURNING *
            "#,
        )
            .bind(&product.id)
            .bind(&product.barcode)
            .bind(&product.description)
            .bind(product.purchase_price)
            .bind(product.resale_price)
            .bind(product.stock_quantity)
            .bind(&product.image_url)
            .bind(&product.supplier)
            .bind(product.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn adjust_stock(&self, id: &str, delta: i32) -> Result<Option<Product>, AppError> {
        self.update_stock_quantity(&self.pool, id, delta).await
    }

    async fn delete_product(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
