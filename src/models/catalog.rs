// src/models/catalog.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "service_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceCategory {
    ComputadoresNotebooks,
    Impressoras,
    Celulares,
    CamerasSeguranca,
}

// Tabela de preços de referência
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCatalogItem {
    pub id: Option<String>,

    #[schema(example = "CN-001")]
    pub code: String,

    pub category: ServiceCategory,

    #[schema(example = "Formatação com backup")]
    pub description: String,

    #[schema(example = "120.00")]
    pub value: Decimal,

    pub cost: Option<Decimal>,

    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}
