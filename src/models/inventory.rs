// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::service_order::validate_not_negative;

// --- Produtos (catálogo + saldo de estoque) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = "7310")]
    pub id: String,

    #[schema(example = "7891234567890")]
    pub barcode: String,

    #[schema(example = "Carregador USB-C 20W")]
    pub description: String,

    pub purchase_price: Decimal,
    pub resale_price: Decimal,

    // Só muda por venda (baixa) ou edição direta. Pode ficar negativo.
    pub stock_quantity: i32,

    pub image_url: String,
    pub supplier: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn from_new(id: String, now: DateTime<Utc>, new: NewProduct) -> Self {
        Self {
            id,
            barcode: new.barcode,
            description: new.description,
            purchase_price: new.purchase_price,
            resale_price: new.resale_price,
            stock_quantity: new.stock_quantity,
            image_url: new.image_url,
            supplier: new.supplier,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.barcode.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub barcode: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub purchase_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub resale_price: Decimal,

    #[serde(default)]
    pub stock_quantity: i32,

    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub supplier: String,
}

/// Entrada (positivo) ou baixa manual (negativo) de estoque.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentPayload {
    #[schema(example = 5)]
    pub delta: i32,
}
