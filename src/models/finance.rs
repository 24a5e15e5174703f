// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{
    budget::BudgetRequest, sales::Sale, service_order::ServiceOrder,
    service_order::validate_not_negative,
};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,  // Entrada
    Expense, // Saída
}

// --- Lançamento de caixa (imutável depois de criado) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    #[schema(example = "OS #OS-48213 - Maria Souza")]
    pub description: String,

    #[schema(example = "250.00")]
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    #[schema(example = "Serviços")]
    pub category: String,

    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    #[serde(default)]
    pub category: String,
}

pub const CATEGORY_SERVICES: &str = "Serviços";
pub const CATEGORY_SALES: &str = "Vendas";

/// Marca que identifica a origem de um lançamento gerado automaticamente.
/// É a chave de deduplicação: procurada por "contém" na descrição.
pub fn reference_tag(source_id: &str) -> String {
    format!("#{}", source_id)
}

impl NewTransaction {
    pub fn income(description: String, amount: Decimal, category: &str) -> Self {
        Self {
            description,
            amount,
            transaction_type: TransactionType::Income,
            category: category.to_string(),
        }
    }

    pub fn income_for_order(order: &ServiceOrder) -> Self {
        Self::income(
            format!("OS {} - {}", reference_tag(&order.id), order.customer_name),
            order.total_value,
            CATEGORY_SERVICES,
        )
    }

    pub fn income_for_budget(budget: &BudgetRequest, amount: Decimal) -> Self {
        Self::income(
            format!("Orçamento {} - {}", reference_tag(&budget.id), budget.customer_name),
            amount,
            CATEGORY_SERVICES,
        )
    }

    pub fn income_for_sale(sale: &Sale) -> Self {
        Self::income(
            format!("Venda {} - {}", reference_tag(&sale.id), sale.customer_name),
            sale.total_value,
            CATEGORY_SALES,
        )
    }

    pub fn into_transaction(self, id: String, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
            date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStats {
    pub total_balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
}
