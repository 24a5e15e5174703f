// src/db/service_order_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow, PgPool};

use crate::{
    common::error::AppError,
    db::storage::ServiceOrderStorage,
    models::{
        budget::EquipmentType,
        service_order::{
            EntryCondition, NewServiceOrder, OrderProductLine, PaymentStatus, ServiceItem,
            ServiceOrder, ServiceOrderStatus,
        },
    },
};

// As linhas embutidas (serviços, produtos, condição de entrada) vivem em colunas JSONB.
#[derive(Debug, FromRow)]
struct ServiceOrderRow {
    id: String,
    status: ServiceOrderStatus,
    created_at: DateTime<Utc>,
    technician: String,
    customer_name: String,
    whatsapp: String,
    email: String,
    cpf: String,
    equipment_type: EquipmentType,
    brand: String,
    model: String,
    serial_number: Option<String>,
    entry_condition: Json<EntryCondition>,
    reported_problem: String,
    diagnosis: Option<String>,
    services: Json<Vec<ServiceItem>>,
    products: Json<Vec<OrderProductLine>>,
    discount: Decimal,
    total_value: Decimal,
    payment_status: PaymentStatus,
    budget_id: Option<String>,
}

impl From<ServiceOrderRow> for ServiceOrder {
    fn from(row: ServiceOrderRow) -> Self {
        Self {
            id: row.id,
            status: row.status,
            created_at: row.created_at,
            technician: row.technician,
            customer_name: row.customer_name,
            whatsapp: row.whatsapp,
            email: row.email,
            cpf: row.cpf,
            equipment_type: row.equipment_type,
            brand: row.brand,
            model: row.model,
            serial_number: row.serial_number,
            entry_condition: row.entry_condition.0,
            reported_problem: row.reported_problem,
            diagnosis: row.diagnosis,
            services: row.services.0,
            products: row.products.0,
            discount: row.discount,
            total_value: row.total_value,
            payment_status: row.payment_status,
            budget_id: row.budget_id,
        }
    }
}

#[derive(Clone)]
pub struct ServiceOrderRepository {
    pool: PgPool,
}

impl ServiceOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceOrderStorage for ServiceOrderRepository {
    async fn list_orders(&self) -> Result<Vec<ServiceOrder>, AppError> {
        let rows = sqlx::query_as::<_, ServiceOrderRow>(
            "SELECT * FROM service_orders ORDER BY created_at DESC",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_order(&self, id: &str) -> Result<Option<ServiceOrder>, AppError> {
        let row = sqlx::query_as::<_, ServiceOrderRow>("SELECT * FROM service_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn create_order(&self, new: NewServiceOrder) -> Result<ServiceOrder, AppError> {
        // Monta o modelo para calcular o total com a mesma regra do modo local;
        // o id provisório é descartado, quem gera é o banco.
        let draft = ServiceOrder::from_new(String::new(), Utc::now(), new)?;

        let row = sqlx::query_as::<_, ServiceOrderRow>(
            r#"
            INSERT INTO service_orders (
                status, technician, customer_name, whatsapp, email, cpf,
                equipment_type, brand, model, serial_number, entry_condition,
                reported_problem, diagnosis, services, products,
                discount, total_value, payment_status, budget_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
            .bind(draft.status)
            .bind(&draft.technician)
            .bind(&draft.customer_name)
            .bind(&draft.whatsapp)
            .bind(&draft.email)
            .bind(&draft.cpf)
            .bind(draft.equipment_type)
            .bind(&draft.brand)
            .bind(&draft.model)
            .bind(&draft.serial_number)
            .bind(Json(&draft.entry_condition))
            .bind(&draft.reported_problem)
            .bind(&draft.diagnosis)
            .bind(Json(&draft.services))
            .bind(Json(&draft.products))
            .bind(draft.discount)
            .bind(draft.total_value)
            .bind(draft.payment_status)
            .bind(&draft.budget_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn save_order(&self, order: &ServiceOrder) -> Result<ServiceOrder, AppError> {
        let row = sqlx::query_as::<_, ServiceOrderRow>(
            r#"
            INSERT INTO service_orders (
                id, status, created_at, technician, customer_name, whatsapp, email, cpf,
                equipment_type, brand, model, serial_number, entry_condition,
                reported_problem, diagnosis, services, products,
                discount, total_value, payment_status, budget_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                technician = EXCLUDED.technician,
                customer_name = EXCLUDED.customer_name,
                whatsapp = EXCLUDED.whatsapp,
                email = EXCLUDED.email,
                cpf = EXCLUDED.cpf,
                equipment_type = EXCLUDED.equipment_type,
                brand = EXCLUDED.brand,
                model = EXCLUDED.model,
                serial_number = EXCLUDED.serial_number,
                entry_condition = EXCLUDED.entry_condition,
                reported_problem = EXCLUDED.reported_problem,
                diagnosis = EXCLUDED.diagnosis,
                services = EXCLUDED.services,
                products = EXCLUDED.products,
                discount = EXCLUDED.discount,
                total_value = EXCLUDED.total_value,
                payment_status = EXCLUDED.payment_status,
                budget_id = EXCLUDED.budget_id
            RETURNING *
            "#,
        )
            .bind(&order.id)
            .bind(order.status)
            .bind(order.created_at)
            .bind(&order.technician)
            .bind(&order.customer_name)
            .bind(&order.whatsapp)
            .bind(&order.email)
            .bind(&order.cpf)
            .bind(order.equipment_type)
            .bind(&order.brand)
            .bind(&order.model)
            .bind(&order.serial_number)
            .bind(Json(&order.entry_condition))
            .bind(&order.reported_problem)
            .bind(&order.diagnosis)
            .bind(Json(&order.services))
            .bind(Json(&order.products))
            .bind(order.discount)
            .bind(order.total_value)
            .bind(order.payment_status)
            .bind(&order.budget_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }
}
