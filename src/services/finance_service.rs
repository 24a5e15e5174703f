// src/services/finance_service.rs

use chrono::{DateTime, Local, TimeZone};
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Repositories,
    models::finance::{reference_tag, CashFlowStats, NewTransaction, Transaction, TransactionType},
    services::dashboard_service::cash_flow_stats,
};

#[derive(Clone)]
pub struct FinanceService {
    repos: Repositories,
}

impl FinanceService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list_transactions(
        &self,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, AppError> {
        let transactions = self.repos.transactions.list_transactions().await?;
        Ok(match kind {
            Some(kind) => transactions
                .into_iter()
                .filter(|t| t.transaction_type == kind)
                .collect(),
            None => transactions,
        })
    }

    /// Lançamento manual (despesas, entradas avulsas).
    pub async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, AppError> {
        new.validate()?;
        self.repos.transactions.create_transaction(new).await
    }

    /// Lança a entrada só se ainda não houver lançamento citando `source_id`.
    /// Devolve `None` quando já existia.
    pub async fn post_income_once(
        &self,
        source_id: &str,
        new: NewTransaction,
    ) -> Result<Option<Transaction>, AppError> {
        if let Some(existing) = self
            .repos
            .transactions
            .find_referencing(&reference_tag(source_id))
            .await?
        {
            tracing::warn!(
                "Lançamento para {} já existe ({}), ignorando duplicata",
                source_id,
                existing.id
            );
            return Ok(None);
        }

        let transaction = self.repos.transactions.create_transaction(new).await?;
        tracing::info!(
            "💰 Entrada lançada: {} ({})",
            transaction.description,
            transaction.amount
        );
        Ok(Some(transaction))
    }

    pub async fn cash_flow(&self) -> Result<CashFlowStats, AppError> {
        self.cash_flow_at(&Local::now()).await
    }

    pub async fn cash_flow_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<CashFlowStats, AppError> {
        let transactions = self.repos.transactions.list_transactions().await?;
        Ok(cash_flow_stats(&transactions, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::local::LocalStore, models::finance::CATEGORY_SERVICES};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn post_income_once_skips_existing_reference() {
        let repos = Repositories::local(LocalStore::in_memory());
        let service = FinanceService::new(repos.clone());

        let first = service
            .post_income_once(
                "OS-12345",
                NewTransaction::income("OS #OS-12345 - Ana".into(), dec!(90), CATEGORY_SERVICES),
            )
            .await
            .unwrap();
        let second = service
            .post_income_once(
                "OS-12345",
                NewTransaction::income("OS #OS-12345 - Ana".into(), dec!(90), CATEGORY_SERVICES),
            )
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(repos.transactions.list_transactions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn manual_transaction_is_validated() {
        let service = FinanceService::new(Repositories::local(LocalStore::in_memory()));

        let result = service
            .create_transaction(NewTransaction {
                description: String::new(),
                amount: dec!(10),
                transaction_type: TransactionType::Expense,
                category: "Aluguel".into(),
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let expense = service
            .create_transaction(NewTransaction {
                description: "Aluguel".into(),
                amount: dec!(1200),
                transaction_type: TransactionType::Expense,
                category: "Aluguel".into(),
            })
            .await
            .unwrap();
        let expenses = service
            .list_transactions(Some(TransactionType::Expense))
            .await
            .unwrap();
        assert_eq!(expenses, vec![expense]);
        assert!(service
            .list_transactions(Some(TransactionType::Income))
            .await
            .unwrap()
            .is_empty());
    }
}
