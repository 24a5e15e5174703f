// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Os cards do topo do dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub monthly_income: Decimal, // Entradas do mês corrente
    pub pending_budgets: usize,  // Orçamentos aguardando resposta
    #[serde(rename = "activeOS")]
    pub active_os: usize,        // OS em andamento
    pub unique_clients: usize,   // E-mails distintos em orçamentos + OS
}
