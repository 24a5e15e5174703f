// src/services/service_order_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::Repositories,
    models::{
        finance::NewTransaction,
        service_order::{
            AddProductPayload, AddServicePayload, NewServiceOrder, ServiceOrder,
            SetDiscountPayload,
        },
    },
    services::FinanceService,
};

#[derive(Clone)]
pub struct ServiceOrderService {
    repos: Repositories,
    finance_service: FinanceService,
}

impl ServiceOrderService {
    pub fn new(repos: Repositories, finance_service: FinanceService) -> Self {
        Self {
            repos,
            finance_service,
        }
    }

    pub async fn create_order(&self, new: NewServiceOrder) -> Result<ServiceOrder, AppError> {
        new.validate()?;
        let order = self.repos.orders.create_order(new).await?;
        tracing::info!("🔧 OS {} aberta para {}", order.id, order.customer_name);
        Ok(order)
    }

    /// Lista todas as OS, ou só as do cliente com o e-mail informado.
    pub async fn list_orders(&self, email: Option<&str>) -> Result<Vec<ServiceOrder>, AppError> {
        let orders = self.repos.orders.list_orders().await?;
        Ok(match email {
            Some(email) => orders.into_iter().filter(|o| o.email == email).collect(),
            None => orders,
        })
    }

    pub async fn get_order(&self, id: &str) -> Result<ServiceOrder, AppError> {
        self.repos
            .orders
            .get_order(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ordem de serviço"))
    }

    /// Grava a OS recalculando o total. Se ela estiver concluída e paga,
    /// lança a receita correspondente (uma vez só por OS).
    pub async fn save_order(&self, mut order: ServiceOrder) -> Result<ServiceOrder, AppError> {
        if order.discount.is_sign_negative() {
            return Err(AppError::InvalidInput("O desconto não pode ser negativo.".into()));
        }
        order.recalculate_total()?;

        let saved = self.repos.orders.save_order(&order).await?;

        if saved.is_paid_completion() {
            self.finance_service
                .post_income_once(&saved.id, NewTransaction::income_for_order(&saved))
                .await?;
        }

        Ok(saved)
    }

    // =========================================================================
    //  ITENS DA OS
    // =========================================================================

    pub async fn add_service(
        &self,
        id: &str,
        payload: AddServicePayload,
    ) -> Result<ServiceOrder, AppError> {
        payload.validate()?;
        let mut order = self.get_order(id).await?;
        order.add_service(
            payload.code,
            payload.description,
            payload.unit_price,
            payload.quantity,
        )?;
        self.save_order(order).await
    }

    pub async fn remove_service(&self, id: &str, line_id: &str) -> Result<ServiceOrder, AppError> {
        let mut order = self.get_order(id).await?;
        if !order.remove_service(line_id)? {
            return Err(AppError::not_found("Serviço da OS"));
        }
        self.save_order(order).await
    }

    /// Inclui um produto do estoque pelo preço de revenda atual.
    pub async fn add_product(
        &self,
        id: &str,
        payload: AddProductPayload,
    ) -> Result<ServiceOrder, AppError> {
        payload.validate()?;
        let mut order = self.get_order(id).await?;
        let product = self
            .repos
            .products
            .get_product(&payload.product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto"))?;

        order.add_product(
            &product.id,
            product.description,
            product.resale_price,
            payload.quantity,
        )?;
        self.save_order(order).await
    }

    pub async fn remove_product(&self, id: &str, line_id: &str) -> Result<ServiceOrder, AppError> {
        let mut order = self.get_order(id).await?;
        if !order.remove_product(line_id)? {
            return Err(AppError::not_found("Produto da OS"));
        }
        self.save_order(order).await
    }

    pub async fn set_discount(
        &self,
        id: &str,
        payload: SetDiscountPayload,
    ) -> Result<ServiceOrder, AppError> {
        payload.validate()?;
        let mut order = self.get_order(id).await?;
        order.set_discount(payload.discount)?;
        self.save_order(order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::local::LocalStore,
        models::{
            budget::EquipmentType,
            finance::TransactionType,
            inventory::NewProduct,
            service_order::{EntryCondition, PaymentStatus, ServiceOrderStatus},
        },
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn service() -> (ServiceOrderService, Repositories) {
        let repos = Repositories::local(LocalStore::in_memory());
        let finance = FinanceService::new(repos.clone());
        (ServiceOrderService::new(repos.clone(), finance), repos)
    }

    fn new_order(email: &str) -> NewServiceOrder {
        NewServiceOrder {
            technician: "Carlos".into(),
            customer_name: "Ana Lima".into(),
            whatsapp: String::new(),
            email: email.into(),
            cpf: String::new(),
            equipment_type: EquipmentType::Celular,
            brand: "Samsung".into(),
            model: "A52".into(),
            serial_number: None,
            entry_condition: EntryCondition::default(),
            reported_problem: "Tela quebrada".into(),
            diagnosis: None,
            services: Vec::new(),
            products: Vec::new(),
            discount: Decimal::ZERO,
            status: None,
            payment_status: None,
            budget_id: None,
        }
    }

    fn service_line(description: &str, unit_price: Decimal, quantity: i32) -> AddServicePayload {
        AddServicePayload {
            code: None,
            description: description.into(),
            unit_price,
            quantity,
        }
    }

    #[tokio::test]
    async fn paid_completion_posts_income_exactly_once() {
        let (service, repos) = service();
        let order = service.create_order(new_order("ana@x.com")).await.unwrap();
        let mut order = service
            .add_service(&order.id, service_line("Troca de tela", dec!(300), 1))
            .await
            .unwrap();

        order.status = ServiceOrderStatus::Completed;
        order.payment_status = PaymentStatus::Paid;
        let order = service.save_order(order).await.unwrap();
        service.save_order(order.clone()).await.unwrap();

        let incomes: Vec<_> = repos
            .transactions
            .list_transactions()
            .await
            .unwrap()
            .into_iter()
            .filter(|t| {
                t.transaction_type == TransactionType::Income && t.description.contains(&order.id)
            })
            .collect();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].amount, dec!(300));
    }

    #[tokio::test]
    async fn unpaid_completion_posts_nothing() {
        let (service, repos) = service();
        let mut order = service.create_order(new_order("ana@x.com")).await.unwrap();
        order.status = ServiceOrderStatus::Completed;
        service.save_order(order).await.unwrap();

        assert!(repos.transactions.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn line_operations_keep_total_consistent() {
        let (service, repos) = service();
        let product = repos
            .products
            .create_product(NewProduct {
                barcode: "789".into(),
                description: "Película".into(),
                purchase_price: dec!(5),
                resale_price: dec!(20),
                stock_quantity: 10,
                image_url: String::new(),
                supplier: String::new(),
            })
            .await
            .unwrap();

        let order = service.create_order(new_order("ana@x.com")).await.unwrap();
        let order = service
            .add_service(&order.id, service_line("Limpeza", dec!(40), 2))
            .await
            .unwrap();
        let payload = AddProductPayload {
            product_id: product.id.clone(),
            quantity: 1,
        };
        service.add_product(&order.id, payload.clone()).await.unwrap();
        let order = service.add_product(&order.id, payload).await.unwrap();

        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].quantity, 2);
        assert_eq!(order.total_value, dec!(120));

        let order = service
            .set_discount(&order.id, SetDiscountPayload { discount: dec!(200) })
            .await
            .unwrap();
        assert_eq!(order.total_value, Decimal::ZERO);

        let line_id = order.services[0].id.clone();
        let order = service.remove_service(&order.id, &line_id).await.unwrap();
        assert!(order.services.is_empty());
        assert_eq!(order.total_value, order.computed_total().unwrap());

        assert!(matches!(
            service.remove_product(&order.id, "nao-existe").await,
            Err(AppError::NotFound(_))
        ));
        // o estoque não é mexido pela OS
        let product = repos.products.get_product(&product.id).await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 10);
    }

    #[tokio::test]
    async fn list_filters_by_customer_email() {
        let (service, _) = service();
        service.create_order(new_order("ana@x.com")).await.unwrap();
        service.create_order(new_order("bia@x.com")).await.unwrap();

        assert_eq!(service.list_orders(None).await.unwrap().len(), 2);
        let orders = service.list_orders(Some("bia@x.com")).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].email, "bia@x.com");
    }

    #[tokio::test]
    async fn oversized_service_line_is_invalid_input() {
        let (service, repos) = service();
        let order = service.create_order(new_order("ana@x.com")).await.unwrap();

        let result = service
            .add_service(&order.id, service_line("Placa", Decimal::MAX, 2))
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));

        let stored = repos.orders.get_order(&order.id).await.unwrap().unwrap();
        assert!(stored.services.is_empty());
        assert_eq!(stored.total_value, Decimal::ZERO);
    }
}
