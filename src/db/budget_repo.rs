// src/db/budget_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::{
    common::error::AppError,
    db::storage::BudgetStorage,
    models::budget::{BudgetRequest, BudgetStatus, EquipmentType, NewBudget},
};

#[derive(Debug, FromRow)]
struct BudgetRow {
    id: String,
    customer_name: String,
    whatsapp: String,
    email: String,
    equipment_type: EquipmentType,
    brand: String,
    model: String,
    problem_description: String,
    status: BudgetStatus,
    approved_value: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl From<BudgetRow> for BudgetRequest {
    fn from(row: BudgetRow) -> Self {
        Self {
            id: row.id,
            customer_name: row.customer_name,
            whatsapp: row.whatsapp,
            email: row.email,
            equipment_type: row.equipment_type,
            brand: row.brand,
            model: row.model,
            problem_description: row.problem_description,
            status: row.status,
            created_at: row.created_at,
            approved_value: row.approved_value,
        }
    }
}

#[derive(Clone)]
pub struct BudgetRepository {
    pool: PgPool,
}

impl BudgetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BudgetStorage for BudgetRepository {
    async fn list_budgets(&self) -> Result<Vec<BudgetRequest>, AppError> {
        let rows = sqlx::query_as::<_, BudgetRow>(
            "SELECT * FROM budgets ORDER BY created_at DESC",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_budget(&self, id: &str) -> Result<Option<BudgetRequest>, AppError> {
        let row = sqlx::query_as::<_, BudgetRow>("SELECT * FROM budgets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create_budget(&self, new: NewBudget) -> Result<BudgetRequest, AppError> {
        // id e created_at ficam por conta do banco
        let row = sqlx::query_as::<_, BudgetRow>(
            r#"
            INSERT INTO budgets (
                customer_name, whatsapp, email, equipment_type,
                brand, model, problem_description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(&new.customer_name)
            .bind(&new.whatsapp)
            .bind(&new.email)
            .bind(new.equipment_type)
            .bind(&new.brand)
            .bind(&new.model)
            .bind(&new.problem_description)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn save_budget(&self, budget: &BudgetRequest) -> Result<BudgetRequest, AppError> {
        let row = sqlx::query_as::<_, BudgetRow>(
            r#"
            INSERT INTO budgets (
                id, customer_name, whatsapp, email, equipment_type, brand, model,
                problem_description, status, approved_value, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                customer_name = EXCLUDED.customer_name,
                whatsapp = EXCLUDED.whatsapp,
                email = EXCLUDED.email,
                equipment_type = EXCLUDED.equipment_type,
                brand = EXCLUDED.brand,
                model = EXCLUDED.model,
                problem_description = EXCLUDED.problem_description,
                status = EXCLUDED.status,
                approved_value = EXCLUDED.approved_value
            RETURNING *
            "#,
        )
            .bind(&budget.id)
            .bind(&budget.customer_name)
            .bind(&budget.whatsapp)
            .bind(&budget.email)
            .bind(budget.equipment_type)
            .bind(&budget.brand)
            .bind(&budget.model)
            .bind(&budget.problem_description)
            .bind(budget.status)
            .bind(budget.approved_value)
            .bind(budget.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }
}
