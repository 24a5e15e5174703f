// src/services/budget_service.rs

use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Repositories,
    models::{
        budget::{BudgetIncome, BudgetRequest, BudgetStatus, NewBudget},
        finance::NewTransaction,
        service_order::{EntryCondition, NewServiceOrder, ServiceOrder},
    },
    services::FinanceService,
};

#[derive(Clone)]
pub struct BudgetService {
    repos: Repositories,
    finance_service: FinanceService,
}

impl BudgetService {
    pub fn new(repos: Repositories, finance_service: FinanceService) -> Self {
        Self {
            repos,
            finance_service,
        }
    }

    /// Pedido de orçamento vindo do formulário público.
    pub async fn create_budget(&self, new: NewBudget) -> Result<BudgetRequest, AppError> {
        new.validate()?;
        let budget = self.repos.budgets.create_budget(new).await?;
        tracing::info!("📝 Novo pedido de orçamento {} de {}", budget.id, budget.customer_name);
        Ok(budget)
    }

    pub async fn list_budgets(&self) -> Result<Vec<BudgetRequest>, AppError> {
        self.repos.budgets.list_budgets().await
    }

    pub async fn get_budget(&self, id: &str) -> Result<BudgetRequest, AppError> {
        self.repos
            .budgets
            .get_budget(id)
            .await?
            .ok_or_else(|| AppError::not_found("Orçamento"))
    }

    pub async fn save_budget(&self, budget: &BudgetRequest) -> Result<BudgetRequest, AppError> {
        self.repos.budgets.save_budget(budget).await
    }

    // =========================================================================
    //  FLUXOS
    // =========================================================================

    pub async fn approve(
        &self,
        id: &str,
        approved_value: Option<Decimal>,
    ) -> Result<BudgetRequest, AppError> {
        let value = match approved_value {
            Some(v) if v > Decimal::ZERO => v,
            _ => {
                return Err(AppError::InvalidInput(
                    "Informe o valor aprovado do orçamento.".into(),
                ))
            }
        };

        let mut budget = self.get_budget(id).await?;
        budget.status = BudgetStatus::Approved;
        budget.approved_value = Some(value);
        self.repos.budgets.save_budget(&budget).await
    }

    pub async fn reject(&self, id: &str) -> Result<BudgetRequest, AppError> {
        let mut budget = self.get_budget(id).await?;
        budget.status = BudgetStatus::Rejected;
        self.repos.budgets.save_budget(&budget).await
    }

    /// Abre uma OS com os dados do cliente e do equipamento. O status do orçamento não muda.
    pub async fn convert_to_service_order(
        &self,
        id: &str,
        technician: String,
    ) -> Result<ServiceOrder, AppError> {
        let budget = self.get_budget(id).await?;

        let new = NewServiceOrder {
            technician,
            customer_name: budget.customer_name,
            whatsapp: budget.whatsapp,
            email: budget.email,
            cpf: String::new(),
            equipment_type: budget.equipment_type,
            brand: budget.brand,
            model: budget.model,
            serial_number: None,
            entry_condition: EntryCondition::default(),
            reported_problem: budget.problem_description,
            diagnosis: None,
            services: Vec::new(),
            products: Vec::new(),
            discount: Decimal::ZERO,
            status: None,
            payment_status: None,
            budget_id: Some(budget.id),
        };

        let order = self.repos.orders.create_order(new).await?;
        tracing::info!("🔧 Orçamento {} convertido na OS {}", id, order.id);
        Ok(order)
    }

    /// Marca o orçamento como concluído e lança a receita do valor aprovado (uma vez só).
    pub async fn convert_to_income(&self, id: &str) -> Result<BudgetIncome, AppError> {
        let mut budget = self.get_budget(id).await?;
        budget.status = BudgetStatus::Completed;
        let budget = self.repos.budgets.save_budget(&budget).await?;

        let transaction = match budget.approved_value {
            Some(value) => {
                self.finance_service
                    .post_income_once(&budget.id, NewTransaction::income_for_budget(&budget, value))
                    .await?
            }
            None => None,
        };

        Ok(BudgetIncome {
            budget,
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::local::LocalStore,
        models::{budget::EquipmentType, finance::TransactionType},
    };
    use rust_decimal_macros::dec;

    fn service() -> (BudgetService, Repositories) {
        let repos = Repositories::local(LocalStore::in_memory());
        let finance = FinanceService::new(repos.clone());
        (BudgetService::new(repos.clone(), finance), repos)
    }

    fn new_budget() -> NewBudget {
        NewBudget {
            customer_name: "Maria Souza".into(),
            whatsapp: "(11) 98888-7777".into(),
            email: "maria@email.com".into(),
            equipment_type: EquipmentType::Notebook,
            brand: "Dell".into(),
            model: "Inspiron 15".into(),
            problem_description: "Não liga".into(),
        }
    }

    #[tokio::test]
    async fn approve_then_convert_to_income_posts_once() {
        let (service, repos) = service();
        let budget = service.create_budget(new_budget()).await.unwrap();

        service.approve(&budget.id, Some(dec!(250))).await.unwrap();
        let first = service.convert_to_income(&budget.id).await.unwrap();
        let second = service.convert_to_income(&budget.id).await.unwrap();

        assert_eq!(first.budget.status, BudgetStatus::Completed);
        let transaction = first.transaction.expect("entrada lançada");
        assert_eq!(transaction.amount, dec!(250));
        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert!(transaction.description.contains(&budget.id));
        assert!(second.transaction.is_none());

        let all = repos.transactions.list_transactions().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn approve_requires_positive_value() {
        let (service, _) = service();
        let budget = service.create_budget(new_budget()).await.unwrap();

        assert!(matches!(
            service.approve(&budget.id, None).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            service.approve(&budget.id, Some(Decimal::ZERO)).await,
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(
            service.get_budget(&budget.id).await.unwrap().status,
            BudgetStatus::Pending
        );
    }

    #[tokio::test]
    async fn convert_without_value_completes_without_income() {
        let (service, repos) = service();
        let budget = service.create_budget(new_budget()).await.unwrap();

        let result = service.convert_to_income(&budget.id).await.unwrap();
        assert_eq!(result.budget.status, BudgetStatus::Completed);
        assert!(result.transaction.is_none());
        assert!(repos.transactions.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn convert_to_service_order_keeps_budget_status() {
        let (service, _) = service();
        let budget = service.create_budget(new_budget()).await.unwrap();
        service.reject(&budget.id).await.unwrap();

        let order = service
            .convert_to_service_order(&budget.id, "Carlos".into())
            .await
            .unwrap();

        assert_eq!(order.budget_id.as_deref(), Some(budget.id.as_str()));
        assert_eq!(order.customer_name, "Maria Souza");
        assert_eq!(order.reported_problem, "Não liga");
        assert_eq!(order.technician, "Carlos");
        assert_eq!(order.total_value, Decimal::ZERO);
        assert_eq!(
            service.get_budget(&budget.id).await.unwrap().status,
            BudgetStatus::Rejected
        );
    }

    #[tokio::test]
    async fn invalid_intake_and_unknown_id() {
        let (service, _) = service();
        let mut invalid = new_budget();
        invalid.email = "não-é-email".into();

        assert!(matches!(
            service.create_budget(invalid).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.reject("0000").await,
            Err(AppError::NotFound(_))
        ));
    }
}
