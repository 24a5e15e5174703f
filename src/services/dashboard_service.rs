// src/services/dashboard_service.rs

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::Repositories,
    models::{
        budget::{BudgetRequest, BudgetStatus},
        dashboard::DashboardStats,
        finance::{CashFlowStats, Transaction, TransactionType},
        service_order::ServiceOrder,
    },
};

// =========================================================================
//  AGREGADOS PUROS
//  Recebem o "agora" no fuso do chamador; o mês é o do calendário local.
// =========================================================================

fn in_month_of<Tz: TimeZone>(date: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    let local = date.with_timezone(&now.timezone());
    local.year() == now.year() && local.month() == now.month()
}

fn sum_of(
    transactions: &[Transaction],
    kind: TransactionType,
    filter: impl Fn(&Transaction) -> bool,
) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.transaction_type == kind && filter(t))
        .map(|t| t.amount)
        .sum()
}

pub fn monthly_income<Tz: TimeZone>(transactions: &[Transaction], now: &DateTime<Tz>) -> Decimal {
    sum_of(transactions, TransactionType::Income, |t| in_month_of(&t.date, now))
}

pub fn cash_flow_stats<Tz: TimeZone>(
    transactions: &[Transaction],
    now: &DateTime<Tz>,
) -> CashFlowStats {
    let income = sum_of(transactions, TransactionType::Income, |_| true);
    let expense = sum_of(transactions, TransactionType::Expense, |_| true);

    CashFlowStats {
        total_balance: income - expense,
        monthly_income: monthly_income(transactions, now),
        monthly_expense: sum_of(transactions, TransactionType::Expense, |t| {
            in_month_of(&t.date, now)
        }),
    }
}

pub fn pending_budgets(budgets: &[BudgetRequest]) -> usize {
    budgets.iter().filter(|b| b.status == BudgetStatus::Pending).count()
}

pub fn active_orders(orders: &[ServiceOrder]) -> usize {
    orders.iter().filter(|o| o.status.is_active()).count()
}

/// E-mails distintos entre orçamentos e OS. E-mail vazio conta como um valor.
pub fn unique_clients(budgets: &[BudgetRequest], orders: &[ServiceOrder]) -> usize {
    budgets
        .iter()
        .map(|b| b.email.as_str())
        .chain(orders.iter().map(|o| o.email.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

#[derive(Clone)]
pub struct DashboardService {
    repos: Repositories,
}

impl DashboardService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        self.stats_at(&Local::now()).await
    }

    pub async fn stats_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<DashboardStats, AppError> {
        let transactions = self.repos.transactions.list_transactions().await?;
        let budgets = self.repos.budgets.list_budgets().await?;
        let orders = self.repos.orders.list_orders().await?;

        Ok(DashboardStats {
            monthly_income: monthly_income(&transactions, now),
            pending_budgets: pending_budgets(&budgets),
            active_os: active_orders(&orders),
            unique_clients: unique_clients(&budgets, &orders),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use rust_decimal_macros::dec;

    fn tx(kind: TransactionType, amount: Decimal, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id: crate::common::ids::opaque_id(),
            description: "teste".into(),
            amount,
            transaction_type: kind,
            category: "Outros".into(),
            date,
        }
    }

    fn budget(email: &str, status: BudgetStatus) -> BudgetRequest {
        BudgetRequest {
            id: "1000".into(),
            customer_name: "Cliente".into(),
            whatsapp: String::new(),
            email: email.into(),
            equipment_type: crate::models::budget::EquipmentType::Notebook,
            brand: String::new(),
            model: String::new(),
            problem_description: String::new(),
            status,
            created_at: Utc::now(),
            approved_value: None,
        }
    }

    #[test]
    fn cash_flow_matches_expected_totals() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let last_month = now - Duration::days(31);
        let transactions = vec![
            tx(TransactionType::Income, dec!(100), now),
            tx(TransactionType::Expense, dec!(30), now),
            tx(TransactionType::Income, dec!(50), last_month),
        ];

        let stats = cash_flow_stats(&transactions, &now);
        assert_eq!(stats.total_balance, dec!(120));
        assert_eq!(stats.monthly_income, dec!(100));
        assert_eq!(stats.monthly_expense, dec!(30));

        let mut reversed = transactions.clone();
        reversed.reverse();
        assert_eq!(cash_flow_stats(&reversed, &now), stats);
    }

    #[test]
    fn month_boundary_follows_callers_timezone() {
        // 1º de julho 01:00 UTC ainda é 30 de junho em São Paulo
        let date = Utc.with_ymd_and_hms(2024, 7, 1, 1, 0, 0).unwrap();
        let transactions = vec![tx(TransactionType::Income, dec!(80), date)];

        let sao_paulo = FixedOffset::west_opt(3 * 3600).unwrap();
        let june_local = sao_paulo.with_ymd_and_hms(2024, 6, 20, 10, 0, 0).unwrap();
        let july_utc = Utc.with_ymd_and_hms(2024, 7, 20, 10, 0, 0).unwrap();

        assert_eq!(monthly_income(&transactions, &june_local), dec!(80));
        assert_eq!(monthly_income(&transactions, &july_utc), dec!(80));
        let july_local = sao_paulo.with_ymd_and_hms(2024, 7, 20, 10, 0, 0).unwrap();
        assert_eq!(monthly_income(&transactions, &july_local), Decimal::ZERO);
    }

    #[test]
    fn unique_clients_counts_empty_email_once() {
        let budgets = vec![
            budget("a@x.com", BudgetStatus::Pending),
            budget("", BudgetStatus::Approved),
            budget("a@x.com", BudgetStatus::Pending),
        ];
        assert_eq!(unique_clients(&budgets, &[]), 2);
        assert_eq!(pending_budgets(&budgets), 2);
    }

    #[tokio::test]
    async fn stats_read_every_collection() {
        use crate::{db::local::LocalStore, models::finance::NewTransaction};

        let repos = Repositories::local(LocalStore::in_memory());
        let service = DashboardService::new(repos.clone());
        let mut approved = budget("b@x.com", BudgetStatus::Approved);
        approved.id = "2000".into();
        repos.budgets.save_budget(&budget("a@x.com", BudgetStatus::Pending)).await.unwrap();
        repos.budgets.save_budget(&approved).await.unwrap();
        repos
            .transactions
            .create_transaction(NewTransaction::income("Avulso".into(), dec!(45), "Outros"))
            .await
            .unwrap();

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.pending_budgets, 1);
        assert_eq!(stats.active_os, 0);
        assert_eq!(stats.unique_clients, 2);
        assert_eq!(stats.monthly_income, dec!(45));
    }
}
