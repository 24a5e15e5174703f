// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{error::AppError, money},
    models::service_order::validate_not_negative,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Credit,
    Debit,
    Money,
    Pix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sale_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[schema(example = "V-1718035200000")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub client_id: Option<String>,
    pub customer_name: String,
    pub items: Vec<SaleItem>,
    pub total_value: Decimal,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleItem {
    #[validate(length(min = 1, message = "O produto é obrigatório."))]
    pub product_id: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub client_id: Option<String>,

    #[serde(default)]
    pub customer_name: String,

    #[validate(length(min = 1, message = "A venda precisa de ao menos um item."), nested)]
    pub items: Vec<NewSaleItem>,

    pub payment_method: PaymentMethod,
}

/// Venda já calculada, pronta para o store persistir.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub client_id: Option<String>,
    pub customer_name: String,
    pub items: Vec<SaleItem>,
    pub total_value: Decimal,
    pub payment_method: PaymentMethod,
}

impl SaleDraft {
    pub fn from_new(new: NewSale) -> Result<Self, AppError> {
        let items = new
            .items
            .into_iter()
            .map(|item| {
                Ok(SaleItem {
                    total: money::line_total(item.unit_price, item.quantity)?,
                    product_id: item.product_id,
                    description: item.description,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
            })
            .collect::<Result<Vec<SaleItem>, AppError>>()?;
        let total_value = money::checked_sum(items.iter().map(|i| i.total))?;

        Ok(Self {
            client_id: new.client_id,
            customer_name: new.customer_name,
            items,
            total_value,
            payment_method: new.payment_method,
        })
    }

    pub fn into_sale(self, id: String, created_at: DateTime<Utc>) -> Sale {
        Sale {
            id,
            created_at,
            client_id: self.client_id,
            customer_name: self.customer_name,
            items: self.items,
            total_value: self.total_value,
            payment_method: self.payment_method,
            status: SaleStatus::Completed,
        }
    }
}

/// Resposta do registro de venda: a venda e a entrada lançada no caixa.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale: Sale,
    pub transaction: crate::models::finance::Transaction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(unit_price: Decimal, quantity: i32) -> NewSaleItem {
        NewSaleItem {
            product_id: "1234".into(),
            description: "Carregador".into(),
            quantity,
            unit_price,
        }
    }

    fn sale(items: Vec<NewSaleItem>) -> NewSale {
        NewSale {
            client_id: None,
            customer_name: "Balcão".into(),
            items,
            payment_method: PaymentMethod::Money,
        }
    }

    #[test]
    fn draft_totals_every_line() {
        let draft = SaleDraft::from_new(sale(vec![item(dec!(35), 2), item(dec!(9.90), 1)])).unwrap();
        assert_eq!(draft.items[0].total, dec!(70));
        assert_eq!(draft.total_value, dec!(79.90));
    }

    #[test]
    fn oversized_prices_are_invalid_input() {
        let err = SaleDraft::from_new(sale(vec![item(Decimal::MAX, 2)])).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = SaleDraft::from_new(sale(vec![item(Decimal::MAX, 1), item(dec!(1), 1)])).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn empty_item_list_fails_validation() {
        assert!(sale(vec![]).validate().is_err());
        assert!(sale(vec![item(dec!(10), 1)]).validate().is_ok());
    }
}
