// src/models/budget.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "equipment_type")]
pub enum EquipmentType {
    #[serde(rename = "PC")]
    #[sqlx(rename = "PC")]
    Pc,
    Notebook,
    Celular,
    Console,
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "budget_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    #[schema(example = "4821")]
    pub id: String,

    #[schema(example = "Maria Souza")]
    pub customer_name: String,

    #[schema(example = "(11) 98888-7777")]
    pub whatsapp: String,

    #[schema(example = "maria@email.com")]
    pub email: String,

    pub equipment_type: EquipmentType,

    #[schema(example = "Dell")]
    pub brand: String,

    #[schema(example = "Inspiron 15")]
    pub model: String,

    #[schema(example = "Não liga após queda")]
    pub problem_description: String,

    pub status: BudgetStatus,

    pub created_at: DateTime<Utc>,

    // Só faz sentido a partir de 'approved'; a exigência fica no ponto de chamada.
    #[schema(example = "250.00")]
    pub approved_value: Option<Decimal>,
}

/// Formulário público de pedido de orçamento.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub customer_name: String,

    #[validate(length(min = 1, message = "O WhatsApp é obrigatório."))]
    pub whatsapp: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    pub equipment_type: EquipmentType,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub model: String,

    #[validate(length(min = 1, message = "Descreva o problema."))]
    pub problem_description: String,
}

impl BudgetRequest {
    /// Monta o registro completo a partir do formulário, com status inicial 'pending'.
    pub fn from_new(id: String, created_at: DateTime<Utc>, new: NewBudget) -> Self {
        Self {
            id,
            customer_name: new.customer_name,
            whatsapp: new.whatsapp,
            email: new.email,
            equipment_type: new.equipment_type,
            brand: new.brand,
            model: new.model,
            problem_description: new.problem_description,
            status: BudgetStatus::Pending,
            created_at,
            approved_value: None,
        }
    }
}

// --- Payloads dos fluxos ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveBudgetPayload {
    #[schema(example = "250.00")]
    pub approved_value: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertBudgetPayload {
    #[serde(default)]
    #[schema(example = "Carlos")]
    pub technician: String,
}

/// Resultado da conversão em receita. `transaction` vem vazio quando não havia
/// valor aprovado ou quando a entrada já tinha sido lançada.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetIncome {
    pub budget: BudgetRequest,
    pub transaction: Option<crate::models::finance::Transaction>,
}
