// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        local::{FileKeyValueStore, KeyValueStore, LocalStore, MemoryKeyValueStore},
        Repositories,
    },
    services::{
        AuthService, BudgetService, CatalogService, ClientService, DashboardService,
        FinanceService, InventoryService, SalesService, ServiceOrderService,
    },
};

// Valor de LOCAL_DATA_DIR que liga o armazenamento só em memória
pub const MEMORY_DATA_DIR: &str = ":memory:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Remote,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub local_data_dir: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password_hash: String,
    pub bind_addr: String,
    pub seed_service_catalog: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "remote" => StorageBackend::Remote,
            other => bail!("STORAGE_BACKEND inválido: '{}' (use 'local' ou 'remote')", other),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Remote && database_url.is_none() {
            bail!("DATABASE_URL deve ser definida quando STORAGE_BACKEND=remote");
        }

        let seed_service_catalog = match env::var("SEED_SERVICE_CATALOG") {
            Ok(v) => !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"),
            Err(_) => true,
        };

        Ok(Self {
            storage_backend,
            local_data_dir: env::var("LOCAL_DATA_DIR").unwrap_or_else(|_| "./data/local".to_string()),
            database_url,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            admin_email: env::var("ADMIN_EMAIL").context("ADMIN_EMAIL deve ser definido")?,
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
                .context("ADMIN_PASSWORD_HASH deve ser definido")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            seed_service_catalog,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    // Só existe no backend remoto (migrações)
    pub db_pool: Option<PgPool>,
    pub repos: Repositories,

    pub auth_service: AuthService,
    pub budget_service: BudgetService,
    pub service_order_service: ServiceOrderService,
    pub client_service: ClientService,
    pub inventory_service: InventoryService,
    pub finance_service: FinanceService,
    pub sales_service: SalesService,
    pub dashboard_service: DashboardService,
    pub catalog_service: CatalogService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Config::from_env()?;

        let (repos, db_pool) = match config.storage_backend {
            StorageBackend::Remote => {
                let database_url = config.database_url.as_deref().unwrap_or_default();
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
                (Repositories::remote(db_pool.clone()), Some(db_pool))
            }
            StorageBackend::Local => {
                let kv: Arc<dyn KeyValueStore> = if config.local_data_dir == MEMORY_DATA_DIR {
                    tracing::info!("✅ Armazenamento local em memória (dados não persistem)");
                    Arc::new(MemoryKeyValueStore::new())
                } else {
                    tracing::info!("✅ Armazenamento local em {}", config.local_data_dir);
                    Arc::new(FileKeyValueStore::new(&config.local_data_dir).await?)
                };
                (Repositories::local(LocalStore::new(kv)), None)
            }
        };

        Ok(Self::with_repositories(config, repos, db_pool))
    }

    /// Monta o gráfico de dependências sobre um conjunto de repositórios já pronto.
    pub fn with_repositories(config: Config, repos: Repositories, db_pool: Option<PgPool>) -> Self {
        let finance_service = FinanceService::new(repos.clone());
        let auth_service = AuthService::new(
            config.admin_email.clone(),
            config.admin_password_hash.clone(),
            config.jwt_secret.clone(),
        );

        Self {
            auth_service,
            budget_service: BudgetService::new(repos.clone(), finance_service.clone()),
            service_order_service: ServiceOrderService::new(repos.clone(), finance_service.clone()),
            client_service: ClientService::new(repos.clone()),
            inventory_service: InventoryService::new(repos.clone()),
            sales_service: SalesService::new(repos.clone()),
            dashboard_service: DashboardService::new(repos.clone()),
            catalog_service: CatalogService::new(repos.clone()),
            finance_service,
            config: Arc::new(config),
            db_pool,
            repos,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Estado em memória com o admin `admin@loja.com` / `segredo123`.
    pub(crate) fn for_tests() -> Self {
        let config = Config {
            storage_backend: StorageBackend::Local,
            local_data_dir: MEMORY_DATA_DIR.into(),
            database_url: None,
            jwt_secret: "chave-de-teste".into(),
            admin_email: "admin@loja.com".into(),
            // custo mínimo para o teste não demorar
            admin_password_hash: bcrypt::hash("segredo123", 4).unwrap(),
            bind_addr: "127.0.0.1:0".into(),
            seed_service_catalog: false,
        };
        Self::with_repositories(config, Repositories::local(LocalStore::in_memory()), None)
    }
}
