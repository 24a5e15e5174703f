// src/db/finance_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::error::AppError,
    db::storage::TransactionStorage,
    models::finance::{NewTransaction, Transaction, TransactionType},
};

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: String,
    description: String,
    amount: Decimal,
    #[sqlx(rename = "type")]
    kind: TransactionType,
    category: String,
    date: DateTime<Utc>,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            amount: row.amount,
            transaction_type: row.kind,
            category: row.category,
            date: row.date,
        }
    }
}

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LANÇAMENTOS (Caixa)
    // =========================================================================

    pub async fn insert_transaction<'e, E>(
        &self,
        executor: E,
        new: &NewTransaction,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO transactions (description, amount, "type", category)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
            .bind(&new.description)
            .bind(new.amount)
            .bind(new.transaction_type)
            .bind(&new.category)
            .fetch_one(executor)
            .await?;

        Ok(row.into())
    }
}

#[async_trait]
impl TransactionStorage for FinanceRepository {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions ORDER BY date DESC",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, AppError> {
        self.insert_transaction(&self.pool, &new).await
    }

    async fn find_referencing(&self, needle: &str) -> Result<Option<Transaction>, AppError> {
        // strpos evita ter de escapar '%' e '_' como no LIKE
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions WHERE strpos(description, $1) > 0 LIMIT 1",
        )
            .bind(needle)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }
}
