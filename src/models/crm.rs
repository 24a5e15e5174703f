// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{budget::BudgetRequest, service_order::ServiceOrder};

// --- CLIENTE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[schema(example = "5120")]
    pub id: String,
    pub created_at: DateTime<Utc>,

    #[schema(example = "João da Silva")]
    pub name: String,

    // Chave de junção com orçamentos e OS (não há FK)
    #[schema(example = "joao@email.com")]
    pub email: String,

    pub whatsapp: String,

    #[schema(example = "123.456.789-00")]
    pub cpf_or_cnpj: String,

    pub address: String,
    pub notes: String,
}

impl Client {
    pub fn from_new(id: String, created_at: DateTime<Utc>, new: NewClient) -> Self {
        Self {
            id,
            created_at,
            name: new.name,
            email: new.email,
            whatsapp: new.whatsapp,
            cpf_or_cnpj: new.cpf_or_cnpj,
            address: new.address,
            notes: new.notes,
        }
    }

    /// Busca textual simples (nome, e-mail, WhatsApp ou documento).
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&self.name, &self.email, &self.whatsapp, &self.cpf_or_cnpj]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub cpf_or_cnpj: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
}

/// Histórico do cliente: tudo que compartilha o mesmo e-mail.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientHistory {
    pub client: Client,
    pub budgets: Vec<BudgetRequest>,
    pub orders: Vec<ServiceOrder>,
}
