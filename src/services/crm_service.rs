// src/services/crm_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::Repositories,
    models::crm::{Client, ClientHistory, NewClient},
};

#[derive(Clone)]
pub struct ClientService {
    repos: Repositories,
}

impl ClientService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn create_client(&self, new: NewClient) -> Result<Client, AppError> {
        new.validate()?;
        self.repos.clients.create_client(new).await
    }

    pub async fn save_client(&self, client: &Client) -> Result<Client, AppError> {
        if client.name.trim().is_empty() {
            return Err(AppError::InvalidInput("O nome do cliente é obrigatório.".into()));
        }
        self.repos.clients.save_client(client).await
    }

    pub async fn list_clients(&self, query: Option<&str>) -> Result<Vec<Client>, AppError> {
        let clients = self.repos.clients.list_clients().await?;
        Ok(match query {
            Some(q) => clients.into_iter().filter(|c| c.matches(q)).collect(),
            None => clients,
        })
    }

    pub async fn get_client(&self, id: &str) -> Result<Client, AppError> {
        self.repos
            .clients
            .get_client(id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente"))
    }

    /// Orçamentos e OS ligados ao cliente pelo e-mail (não há chave estrangeira).
    pub async fn history(&self, id: &str) -> Result<ClientHistory, AppError> {
        let client = self.get_client(id).await?;

        // Sem e-mail não há como ligar nada ao cliente
        if client.email.trim().is_empty() {
            return Ok(ClientHistory {
                client,
                budgets: Vec::new(),
                orders: Vec::new(),
            });
        }

        let budgets = self
            .repos
            .budgets
            .list_budgets()
            .await?
            .into_iter()
            .filter(|b| b.email == client.email)
            .collect();
        let orders = self
            .repos
            .orders
            .list_orders()
            .await?
            .into_iter()
            .filter(|o| o.email == client.email)
            .collect();

        Ok(ClientHistory {
            client,
            budgets,
            orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::local::LocalStore,
        models::budget::{EquipmentType, NewBudget},
    };

    fn new_client(name: &str, email: &str) -> NewClient {
        NewClient {
            name: name.into(),
            email: email.into(),
            whatsapp: "(11) 90000-0000".into(),
            cpf_or_cnpj: "123.456.789-00".into(),
            address: String::new(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn create_requires_name_and_filters_case_insensitive() {
        let repos = Repositories::local(LocalStore::in_memory());
        let service = ClientService::new(repos);

        assert!(matches!(
            service.create_client(new_client("", "x@x.com")).await,
            Err(AppError::ValidationError(_))
        ));

        service.create_client(new_client("João da Silva", "joao@x.com")).await.unwrap();
        service.create_client(new_client("Bia Costa", "bia@x.com")).await.unwrap();

        let found = service.list_clients(Some("JOÃO")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "joao@x.com");
        assert_eq!(service.list_clients(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn save_rejects_blank_name() {
        let service = ClientService::new(Repositories::local(LocalStore::in_memory()));
        let mut client = service.create_client(new_client("Ana", "ana@x.com")).await.unwrap();
        client.name = "   ".into();

        assert!(matches!(
            service.save_client(&client).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn history_joins_by_email() {
        let repos = Repositories::local(LocalStore::in_memory());
        let service = ClientService::new(repos.clone());
        let client = service.create_client(new_client("Ana", "ana@x.com")).await.unwrap();

        for email in ["ana@x.com", "outro@x.com"] {
            repos
                .budgets
                .create_budget(NewBudget {
                    customer_name: "Ana".into(),
                    whatsapp: "1".into(),
                    email: email.into(),
                    equipment_type: EquipmentType::Pc,
                    brand: String::new(),
                    model: String::new(),
                    problem_description: "Lento".into(),
                })
                .await
                .unwrap();
        }

        let history = service.history(&client.id).await.unwrap();
        assert_eq!(history.budgets.len(), 1);
        assert!(history.orders.is_empty());
    }

    #[tokio::test]
    async fn client_without_email_has_empty_history() {
        let repos = Repositories::local(LocalStore::in_memory());
        let service = ClientService::new(repos.clone());
        let client = service.create_client(new_client("Balcão", "")).await.unwrap();

        repos
            .budgets
            .create_budget(NewBudget {
                customer_name: "Sem e-mail".into(),
                whatsapp: "1".into(),
                email: String::new(),
                equipment_type: EquipmentType::Pc,
                brand: String::new(),
                model: String::new(),
                problem_description: "Não liga".into(),
            })
            .await
            .unwrap();

        let history = service.history(&client.id).await.unwrap();
        assert!(history.budgets.is_empty());
        assert!(history.orders.is_empty());
    }
}
