// src/db/sales_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow, PgPool};

use crate::{
    common::error::AppError,
    db::{storage::SaleStorage, FinanceRepository, InventoryRepository},
    models::{
        finance::{NewTransaction, Transaction},
        sales::{PaymentMethod, Sale, SaleDraft, SaleItem, SaleStatus},
    },
};

#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    created_at: DateTime<Utc>,
    client_id: Option<String>,
    customer_name: String,
    items: Json<Vec<SaleItem>>,
    total_value: Decimal,
    payment_method: PaymentMethod,
    status: SaleStatus,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            client_id: row.client_id,
            customer_name: row.customer_name,
            items: row.items.0,
            total_value: row.total_value,
            payment_method: row.payment_method,
            status: row.status,
        }
    }
}

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
    inventory_repo: InventoryRepository,
    finance_repo: FinanceRepository,
}

impl SalesRepository {
    pub fn new(
        pool: PgPool,
        inventory_repo: InventoryRepository,
        finance_repo: FinanceRepository,
    ) -> Self {
        Self {
            pool,
            inventory_repo,
            finance_repo,
        }
    }
}

#[async_trait]
impl SaleStorage for SalesRepository {
    async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        let rows = sqlx::query_as::<_, SaleRow>("SELECT * FROM sales ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_sale(&self, id: &str) -> Result<Option<Sale>, AppError> {
        let row = sqlx::query_as::<_, SaleRow>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn record_sale(&self, draft: SaleDraft) -> Result<(Sale, Transaction), AppError> {
        // Venda, baixa de estoque e entrada no caixa: tudo ou nada
        let mut tx = self.pool.begin().await?;

        let sale: Sale = sqlx::query_as::<_, SaleRow>(
            r#"
            INSERT INTO sales (client_id, customer_name, items, total_value, payment_method, status)
            VALUES ($1, $2, $3, $4, $5, 'completed')
            RETURNING *
            "#,
        )
            .bind(&draft.client_id)
            .bind(&draft.customer_name)
            .bind(Json(&draft.items))
            .bind(draft.total_value)
            .bind(draft.payment_method)
            .fetch_one(&mut *tx)
            .await?
            .into();

        for item in &sale.items {
            let updated = self
                .inventory_repo
                .update_stock_quantity(&mut *tx, &item.product_id, -item.quantity)
                .await?;
            if updated.is_none() {
                tracing::warn!(
                    "Venda {}: produto {} não encontrado, estoque não baixado",
                    sale.id,
                    item.product_id
                );
            }
        }

        let transaction = self
            .finance_repo
            .insert_transaction(&mut *tx, &NewTransaction::income_for_sale(&sale))
            .await?;

        tx.commit().await?;
        Ok((sale, transaction))
    }
}
