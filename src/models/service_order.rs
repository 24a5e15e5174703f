// src/models/service_order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::{error::AppError, money},
    models::budget::EquipmentType,
};

// --- Enums ---

// Transições não são validadas: qualquer tela pode mover para qualquer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "service_order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceOrderStatus {
    Open,
    Diagnosing,
    PendingApproval,
    Approved,
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceOrderStatus {
    /// Status que contam como OS "ativa" no dashboard.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ServiceOrderStatus::Open
                | ServiceOrderStatus::Diagnosing
                | ServiceOrderStatus::PendingApproval
                | ServiceOrderStatus::Approved
                | ServiceOrderStatus::InProgress
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

// --- Objetos de valor embutidos ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryCondition {
    pub turn_on: bool,
    pub broken_screen: bool,
    pub no_accessories: bool,
    pub has_password: bool,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub id: String,
    pub code: Option<String>,
    pub description: String,
    // unitPrice x quantidade, congelado no momento da inclusão
    pub value: Decimal,
    pub amount: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductLine {
    pub id: String,
    pub product_id: String,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub total: Decimal,
}

// --- Ordem de Serviço ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    #[schema(example = "OS-48213")]
    pub id: String,
    pub status: ServiceOrderStatus,
    pub created_at: DateTime<Utc>,

    #[schema(example = "Carlos")]
    pub technician: String,

    pub customer_name: String,
    pub whatsapp: String,
    pub email: String,
    pub cpf: String,

    pub equipment_type: EquipmentType,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub entry_condition: EntryCondition,

    pub reported_problem: String,
    pub diagnosis: Option<String>,

    pub services: Vec<ServiceItem>,
    pub products: Vec<OrderProductLine>,

    pub discount: Decimal,
    // Cache derivado: max(0, Σ serviços + Σ produtos − desconto)
    pub total_value: Decimal,
    pub payment_status: PaymentStatus,

    pub budget_id: Option<String>,
}

impl ServiceOrder {
    pub fn from_new(
        id: String,
        created_at: DateTime<Utc>,
        new: NewServiceOrder,
    ) -> Result<Self, AppError> {
        let mut order = Self {
            id,
            status: new.status.unwrap_or(ServiceOrderStatus::Open),
            created_at,
            technician: new.technician,
            customer_name: new.customer_name,
            whatsapp: new.whatsapp,
            email: new.email,
            cpf: new.cpf,
            equipment_type: new.equipment_type,
            brand: new.brand,
            model: new.model,
            serial_number: new.serial_number,
            entry_condition: new.entry_condition,
            reported_problem: new.reported_problem,
            diagnosis: new.diagnosis,
            services: new.services,
            products: new.products,
            discount: new.discount,
            total_value: Decimal::ZERO,
            payment_status: new.payment_status.unwrap_or(PaymentStatus::Pending),
            budget_id: new.budget_id,
        };
        order.recalculate_total()?;
        Ok(order)
    }

    pub fn computed_total(&self) -> Result<Decimal, AppError> {
        let services = money::checked_sum(self.services.iter().map(|s| s.value))?;
        let products = money::checked_sum(self.products.iter().map(|p| p.total))?;
        let gross = money::checked_sum([services, products])?;
        Ok(money::checked_sub(gross, self.discount)?.max(Decimal::ZERO))
    }

    pub fn recalculate_total(&mut self) -> Result<(), AppError> {
        self.total_value = self.computed_total()?;
        Ok(())
    }

    /// Inclui um serviço; o valor da linha é preço unitário x quantidade.
    pub fn add_service(
        &mut self,
        code: Option<String>,
        description: String,
        unit_price: Decimal,
        quantity: i32,
    ) -> Result<&ServiceItem, AppError> {
        let value = money::line_total(unit_price, quantity)?;
        self.services.push(ServiceItem {
            id: crate::common::ids::opaque_id(),
            code,
            description,
            value,
            amount: Some(quantity),
        });
        if let Err(e) = self.recalculate_total() {
            self.services.pop();
            return Err(e);
        }
        // acabou de ser inserido
        Ok(&self.services[self.services.len() - 1])
    }

    pub fn remove_service(&mut self, line_id: &str) -> Result<bool, AppError> {
        let before = self.services.len();
        self.services.retain(|s| s.id != line_id);
        self.recalculate_total()?;
        Ok(self.services.len() != before)
    }

    /// Inclui um produto. Se já houver linha para o mesmo produto, soma a quantidade nela.
    pub fn add_product(
        &mut self,
        product_id: &str,
        description: String,
        unit_price: Decimal,
        quantity: i32,
    ) -> Result<(), AppError> {
        let previous = self.products.clone();
        match self.products.iter_mut().find(|p| p.product_id == product_id) {
            Some(line) => {
                let merged = line.quantity.checked_add(quantity).ok_or_else(|| {
                    AppError::InvalidInput("Quantidade fora do limite permitido.".into())
                })?;
                line.total = money::line_total(line.unit_price, merged)?;
                line.quantity = merged;
            }
            None => self.products.push(OrderProductLine {
                id: crate::common::ids::opaque_id(),
                product_id: product_id.to_string(),
                description,
                unit_price,
                quantity,
                total: money::line_total(unit_price, quantity)?,
            }),
        }
        if let Err(e) = self.recalculate_total() {
            self.products = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn remove_product(&mut self, line_id: &str) -> Result<bool, AppError> {
        let before = self.products.len();
        self.products.retain(|p| p.id != line_id);
        self.recalculate_total()?;
        Ok(self.products.len() != before)
    }

    pub fn set_discount(&mut self, discount: Decimal) -> Result<(), AppError> {
        self.discount = discount;
        self.recalculate_total()
    }

    pub fn is_paid_completion(&self) -> bool {
        self.status == ServiceOrderStatus::Completed && self.payment_status == PaymentStatus::Paid
    }
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceOrder {
    #[serde(default)]
    pub technician: String,

    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub customer_name: String,

    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cpf: String,

    pub equipment_type: EquipmentType,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    pub serial_number: Option<String>,
    #[serde(default)]
    pub entry_condition: EntryCondition,

    #[serde(default)]
    pub reported_problem: String,
    pub diagnosis: Option<String>,

    #[serde(default)]
    pub services: Vec<ServiceItem>,
    #[serde(default)]
    pub products: Vec<OrderProductLine>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub discount: Decimal,

    pub status: Option<ServiceOrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub budget_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddServicePayload {
    pub code: Option<String>,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    #[serde(default = "one")]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddProductPayload {
    #[validate(length(min = 1, message = "O produto é obrigatório."))]
    pub product_id: String,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    #[serde(default = "one")]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetDiscountPayload {
    #[validate(custom(function = "validate_not_negative"))]
    pub discount: Decimal,
}

fn one() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn empty_order() -> ServiceOrder {
        ServiceOrder::from_new(
            "OS-10000".into(),
            Utc::now(),
            NewServiceOrder {
                technician: "Carlos".into(),
                customer_name: "Ana".into(),
                whatsapp: String::new(),
                email: "ana@email.com".into(),
                cpf: String::new(),
                equipment_type: EquipmentType::Notebook,
                brand: "Dell".into(),
                model: "G15".into(),
                serial_number: None,
                entry_condition: EntryCondition::default(),
                reported_problem: "Tela azul".into(),
                diagnosis: None,
                services: vec![],
                products: vec![],
                discount: Decimal::ZERO,
                status: None,
                payment_status: None,
                budget_id: None,
            },
        )
        .unwrap()
    }

    fn assert_total_invariant(order: &ServiceOrder) {
        let services: Decimal = order.services.iter().map(|s| s.value).sum();
        let products: Decimal = order.products.iter().map(|p| p.total).sum();
        let expected = (services + products - order.discount).max(Decimal::ZERO);
        assert_eq!(order.total_value, expected);
    }

    #[test]
    fn new_order_defaults_to_open_and_pending_payment() {
        let order = empty_order();
        assert_eq!(order.status, ServiceOrderStatus::Open);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total_value, Decimal::ZERO);
    }

    #[test]
    fn total_follows_every_line_mutation() {
        let mut order = empty_order();

        order.add_service(Some("F01".into()), "Formatação".into(), dec!(80), 2).unwrap();
        assert_eq!(order.total_value, dec!(160));
        assert_total_invariant(&order);

        order.add_product("p-1", "SSD 240GB".into(), dec!(150.50), 1).unwrap();
        assert_eq!(order.total_value, dec!(310.50));
        assert_total_invariant(&order);

        order.set_discount(dec!(10.50)).unwrap();
        assert_eq!(order.total_value, dec!(300));
        assert_total_invariant(&order);

        let service_id = order.services[0].id.clone();
        assert!(order.remove_service(&service_id).unwrap());
        assert_eq!(order.total_value, dec!(140));
        assert_total_invariant(&order);

        let product_id = order.products[0].id.clone();
        assert!(order.remove_product(&product_id).unwrap());
        assert_eq!(order.total_value, Decimal::ZERO);
        assert_total_invariant(&order);
    }

    #[test]
    fn discount_larger_than_items_clamps_total_at_zero() {
        let mut order = empty_order();
        order.add_service(None, "Limpeza".into(), dec!(50), 1).unwrap();
        order.set_discount(dec!(80)).unwrap();
        assert_eq!(order.total_value, Decimal::ZERO);
    }

    #[test]
    fn same_product_is_merged_into_one_line() {
        let mut order = empty_order();
        order.add_product("p-1", "Cabo HDMI".into(), dec!(25), 1).unwrap();
        order.add_product("p-1", "Cabo HDMI".into(), dec!(25), 2).unwrap();

        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].quantity, 3);
        assert_eq!(order.products[0].total, dec!(75));
        assert_eq!(order.total_value, dec!(75));
    }

    #[test]
    fn removing_unknown_line_reports_false() {
        let mut order = empty_order();
        assert!(!order.remove_service("nao-existe").unwrap());
        assert!(!order.remove_product("nao-existe").unwrap());
    }

    #[test]
    fn oversized_lines_are_rejected_without_touching_the_order() {
        let mut order = empty_order();
        order.add_product("p-1", "Cabo HDMI".into(), dec!(25), 1).unwrap();

        let err = order.add_service(None, "Placa".into(), Decimal::MAX, 2).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        let err = order.add_product("p-1", "Cabo HDMI".into(), dec!(25), i32::MAX).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        let err = order.add_service(None, "Placa".into(), Decimal::MAX, 1).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        assert!(order.services.is_empty());
        assert_eq!(order.products[0].quantity, 1);
        assert_eq!(order.total_value, dec!(25));
    }

    #[test]
    fn only_open_work_counts_as_active() {
        assert!(ServiceOrderStatus::InProgress.is_active());
        assert!(ServiceOrderStatus::PendingApproval.is_active());
        assert!(!ServiceOrderStatus::Completed.is_active());
        assert!(!ServiceOrderStatus::Cancelled.is_active());
    }
}
