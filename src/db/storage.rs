// src/db/storage.rs

//! Contrato de acesso a dados, igual para os dois backends.
//!
//! Cada coleção tem a sua trait. O restante da aplicação só conhece o
//! [`Repositories`], montado uma única vez a partir da configuração; nenhum
//! código chamador decide qual backend está por trás.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{
        local::LocalStore, BudgetRepository, CatalogRepository, ClientRepository,
        FinanceRepository, InventoryRepository, SalesRepository, ServiceOrderRepository,
        SettingsRepository,
    },
    models::{
        budget::{BudgetRequest, NewBudget},
        catalog::ServiceCatalogItem,
        crm::{Client, NewClient},
        finance::{NewTransaction, Transaction},
        inventory::{NewProduct, Product},
        sales::{Sale, SaleDraft},
        service_order::{NewServiceOrder, ServiceOrder},
        settings::Settings,
    },
};

#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Devolve a linha única, criando-a com os padrões se ainda não existir.
    async fn get_settings(&self) -> Result<Settings, AppError>;

    async fn save_settings(&self, settings: &Settings) -> Result<Settings, AppError>;
}

#[async_trait]
pub trait BudgetStorage: Send + Sync {
    /// Mais recentes primeiro.
    async fn list_budgets(&self) -> Result<Vec<BudgetRequest>, AppError>;

    async fn get_budget(&self, id: &str) -> Result<Option<BudgetRequest>, AppError>;

    async fn create_budget(&self, new: NewBudget) -> Result<BudgetRequest, AppError>;

    /// Upsert: substitui se o id existir, senão insere.
    async fn save_budget(&self, budget: &BudgetRequest) -> Result<BudgetRequest, AppError>;
}

#[async_trait]
pub trait ServiceOrderStorage: Send + Sync {
    async fn list_orders(&self) -> Result<Vec<ServiceOrder>, AppError>;

    async fn get_order(&self, id: &str) -> Result<Option<ServiceOrder>, AppError>;

    async fn create_order(&self, new: NewServiceOrder) -> Result<ServiceOrder, AppError>;

    async fn save_order(&self, order: &ServiceOrder) -> Result<ServiceOrder, AppError>;
}

#[async_trait]
pub trait ClientStorage: Send + Sync {
    async fn list_clients(&self) -> Result<Vec<Client>, AppError>;

    async fn get_client(&self, id: &str) -> Result<Option<Client>, AppError>;

    async fn create_client(&self, new: NewClient) -> Result<Client, AppError>;

    async fn save_client(&self, client: &Client) -> Result<Client, AppError>;
}

#[async_trait]
pub trait ProductStorage: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    async fn get_product(&self, id: &str) -> Result<Option<Product>, AppError>;

    async fn create_product(&self, new: NewProduct) -> Result<Product, AppError>;

    /// Upsert que sempre renova o `updatedAt`.
    async fn save_product(&self, product: &Product) -> Result<Product, AppError>;

    /// Soma `delta` ao estoque (negativo = baixa). Não trava em zero.
    async fn adjust_stock(&self, id: &str, delta: i32) -> Result<Option<Product>, AppError>;

    /// Devolve `false` se o produto não existia.
    async fn delete_product(&self, id: &str) -> Result<bool, AppError>;
}

/// Lançamentos são imutáveis: não há update nem delete.
#[async_trait]
pub trait TransactionStorage: Send + Sync {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError>;

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, AppError>;

    /// Primeiro lançamento cuja descrição contém `needle`.
    async fn find_referencing(&self, needle: &str) -> Result<Option<Transaction>, AppError>;
}

#[async_trait]
pub trait SaleStorage: Send + Sync {
    async fn list_sales(&self) -> Result<Vec<Sale>, AppError>;

    async fn get_sale(&self, id: &str) -> Result<Option<Sale>, AppError>;

    /// Grava a venda, baixa o estoque de cada item e lança a entrada no caixa.
    async fn record_sale(&self, draft: SaleDraft) -> Result<(Sale, Transaction), AppError>;
}

#[async_trait]
pub trait ServiceCatalogStorage: Send + Sync {
    async fn list_catalog(&self) -> Result<Vec<ServiceCatalogItem>, AppError>;

    /// Upsert pelo código do serviço.
    async fn save_catalog_item(
        &self,
        item: ServiceCatalogItem,
    ) -> Result<ServiceCatalogItem, AppError>;

    /// Carga inicial; só grava se o catálogo estiver vazio. Devolve quantos entraram.
    async fn seed_catalog(&self, items: Vec<ServiceCatalogItem>) -> Result<usize, AppError>;
}

/// Conjunto de repositórios ativos.
#[derive(Clone)]
pub struct Repositories {
    pub settings: Arc<dyn SettingsStorage>,
    pub budgets: Arc<dyn BudgetStorage>,
    pub orders: Arc<dyn ServiceOrderStorage>,
    pub clients: Arc<dyn ClientStorage>,
    pub products: Arc<dyn ProductStorage>,
    pub transactions: Arc<dyn TransactionStorage>,
    pub sales: Arc<dyn SaleStorage>,
    pub catalog: Arc<dyn ServiceCatalogStorage>,
}

impl Repositories {
    /// Backend local: uma coleção JSON por chave.
    pub fn local(store: LocalStore) -> Self {
        let store = Arc::new(store);
        Self {
            settings: store.clone(),
            budgets: store.clone(),
            orders: store.clone(),
            clients: store.clone(),
            products: store.clone(),
            transactions: store.clone(),
            sales: store.clone(),
            catalog: store,
        }
    }

    /// Backend remoto: Postgres, ids gerados pelo banco.
    pub fn remote(pool: PgPool) -> Self {
        let inventory_repo = InventoryRepository::new(pool.clone());
        let finance_repo = FinanceRepository::new(pool.clone());

        Self {
            settings: Arc::new(SettingsRepository::new(pool.clone())),
            budgets: Arc::new(BudgetRepository::new(pool.clone())),
            orders: Arc::new(ServiceOrderRepository::new(pool.clone())),
            clients: Arc::new(ClientRepository::new(pool.clone())),
            products: Arc::new(inventory_repo.clone()),
            transactions: Arc::new(finance_repo.clone()),
            sales: Arc::new(SalesRepository::new(pool.clone(), inventory_repo, finance_repo)),
            catalog: Arc::new(CatalogRepository::new(pool)),
        }
    }
}
