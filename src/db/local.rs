// src/db/local.rs

//! Backend local: um armazenamento chave-valor com um array JSON por coleção.
//!
//! É o equivalente do localStorage do navegador. Não há esquema; o formato em
//! disco é o próprio modelo em camelCase.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Duration;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::{
    common::{error::AppError, ids},
    db::storage::{
        BudgetStorage, ClientStorage, ProductStorage, SaleStorage, ServiceCatalogStorage,
        ServiceOrderStorage, SettingsStorage, TransactionStorage,
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

// Chaves fixas, uma por coleção
pub const SETTINGS_KEY: &str = "assistencia:settings";
pub const BUDGETS_KEY: &str = "assistencia:budgets";
pub const ORDERS_KEY: &str = "assistencia:service_orders";
pub const CLIENTS_KEY: &str = "assistencia:clients";
pub const PRODUCTS_KEY: &str = "assistencia:products";
pub const TRANSACTIONS_KEY: &str = "assistencia:transactions";
pub const SALES_KEY: &str = "assistencia:sales";
pub const CATALOG_KEY: &str = "assistencia:service_catalog";

// =========================================================================
//  ARMAZENAMENTO CHAVE-VALOR
// =========================================================================

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Tudo em memória. Some ao encerrar o processo (modo demonstração e testes).
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Um arquivo `.json` por chave dentro do diretório de dados.
pub struct FileKeyValueStore {
    base_directory: PathBuf,
}

impl FileKeyValueStore {
    pub async fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self, AppError> {
        let base_directory = base_directory.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&base_directory).await?;
        Ok(Self { base_directory })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.base_directory.join(format!("{}.json", file_name))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match tokio::fs::read_to_string(self.file_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        // Escreve num temporário e renomeia, para não deixar JSON pela metade
        let path = self.file_path(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

// =========================================================================
//  STORE LOCAL (todas as coleções)
// =========================================================================

/// Registros que têm id próprio dentro de uma coleção.
trait Keyed {
    fn key(&self) -> &str;

    /// Chamado pelo `upsert` antes de sobrescrever um registro existente.
    fn keep_from(&mut self, _previous: &Self) {}
}

impl Keyed for BudgetRequest {
    fn key(&self) -> &str {
        &self.id
    }

    fn keep_from(&mut self, previous: &Self) {
        self.created_at = previous.created_at;
    }
}

impl Keyed for ServiceOrder {
    fn key(&self) -> &str {
        &self.id
    }

    fn keep_from(&mut self, previous: &Self) {
        self.created_at = previous.created_at;
    }
}

impl Keyed for Client {
    fn key(&self) -> &str {
        &self.id
    }

    fn keep_from(&mut self, previous: &Self) {
        self.created_at = previous.created_at;
    }
}

impl Keyed for Product {
    fn key(&self) -> &str {
        &self.id
    }

    fn keep_from(&mut self, previous: &Self) {
        self.created_at = previous.created_at;
    }
}

impl Keyed for Transaction {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Sale {
    fn key(&self) -> &str {
        &self.id
    }
}

// O catálogo é indexado pelo código, não pelo id
impl Keyed for ServiceCatalogItem {
    fn key(&self) -> &str {
        &self.code
    }
}

pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
    // Serializa os ciclos ler-modificar-gravar. Leituras não passam por aqui.
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, AppError> {
        match self.kv.get(key).await? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::StorageError(format!("coleção '{}' corrompida: {}", key, e))
            }),
        }
    }

    async fn persist<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), AppError> {
        let raw = serde_json::to_string(items)?;
        self.kv.set(key, &raw).await
    }

    async fn find<T: DeserializeOwned + Keyed>(
        &self,
        key: &str,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        let items: Vec<T> = self.load(key).await?;
        Ok(items.into_iter().find(|item| item.key() == id))
    }

    /// Insere no início (mais novo primeiro). Chamar com o `write_lock` em mãos.
    async fn prepend<T: Serialize + DeserializeOwned + Keyed>(
        &self,
        key: &str,
        item: T,
    ) -> Result<T, AppError>
    where
        T: Clone,
    {
        let mut items: Vec<T> = self.load(key).await?;
        items.insert(0, item.clone());
        self.persist(key, &items).await?;
        Ok(item)
    }

    /// Substitui o registro de mesmo id ou insere no início.
    /// O `createdAt` de um registro existente nunca muda.
    async fn upsert<T: Serialize + DeserializeOwned + Keyed + Clone>(
        &self,
        key: &str,
        mut item: T,
    ) -> Result<T, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut items: Vec<T> = self.load(key).await?;
        match items.iter_mut().find(|existing| existing.key() == item.key()) {
            Some(existing) => {
                item.keep_from(existing);
                *existing = item.clone();
            }
            None => items.insert(0, item.clone()),
        }
        self.persist(key, &items).await?;
        Ok(item)
    }

    /// Gera um id de 4 dígitos que ainda não existe na coleção.
    async fn fresh_numeric_id<T: DeserializeOwned + Keyed>(
        &self,
        key: &str,
    ) -> Result<String, AppError> {
        let items: Vec<T> = self.load(key).await?;
        if items.len() >= ids::FOUR_DIGIT_CAPACITY {
            return Err(AppError::StorageError(format!(
                "coleção '{}' sem ids livres de 4 dígitos",
                key
            )));
        }
        ids::unique_id(ids::four_digit_id, |candidate| {
            items.iter().any(|i| i.key() == candidate)
        })
    }

    async fn apply_stock_delta(&self, id: &str, delta: i32) -> Result<Option<Product>, AppError> {
        let mut products: Vec<Product> = self.load(PRODUCTS_KEY).await?;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        product.stock_quantity = product.stock_quantity.checked_add(delta).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "ajuste de estoque fora do limite para o produto {}",
                product.id
            ))
        })?;
        product.updated_at = ids::now();
        if product.stock_quantity < 0 {
            tracing::warn!(
                "⚠️ Estoque negativo no produto {} ({}): {}",
                product.id,
                product.description,
                product.stock_quantity
            );
        }
        let updated = product.clone();
        self.persist(PRODUCTS_KEY, &products).await?;
        Ok(Some(updated))
    }

    async fn insert_transaction(&self, new: NewTransaction) -> Result<Transaction, AppError> {
        let transaction = new.into_transaction(ids::opaque_id(), ids::now());
        self.prepend(TRANSACTIONS_KEY, transaction).await
    }
}

fn parse_settings(raw: &str) -> Result<Settings, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::StorageError(format!("configurações corrompidas: {}", e)))
}

#[async_trait]
impl SettingsStorage for LocalStore {
    async fn get_settings(&self) -> Result<Settings, AppError> {
        if let Some(raw) = self.kv.get(SETTINGS_KEY).await? {
            return parse_settings(&raw);
        }

        let _guard = self.write_lock.lock().await;
        // Outro pedido pode ter gravado enquanto esperávamos o lock
        if let Some(raw) = self.kv.get(SETTINGS_KEY).await? {
            return parse_settings(&raw);
        }
        let defaults = Settings::default();
        self.kv
            .set(SETTINGS_KEY, &serde_json::to_string(&defaults)?)
            .await?;
        Ok(defaults)
    }

    async fn save_settings(&self, settings: &Settings) -> Result<Settings, AppError> {
        let _guard = self.write_lock.lock().await;
        self.kv
            .set(SETTINGS_KEY, &serde_json::to_string(settings)?)
            .await?;
        Ok(settings.clone())
    }
}

#[async_trait]
impl BudgetStorage for LocalStore {
    async fn list_budgets(&self) -> Result<Vec<BudgetRequest>, AppError> {
        self.load(BUDGETS_KEY).await
    }

    async fn get_budget(&self, id: &str) -> Result<Option<BudgetRequest>, AppError> {
        self.find(BUDGETS_KEY, id).await
    }

    async fn create_budget(&self, new: NewBudget) -> Result<BudgetRequest, AppError> {
        let _guard = self.write_lock.lock().await;
        let id = self.fresh_numeric_id::<BudgetRequest>(BUDGETS_KEY).await?;
        let budget = BudgetRequest::from_new(id, ids::now(), new);
        self.prepend(BUDGETS_KEY, budget).await
    }

    async fn save_budget(&self, budget: &BudgetRequest) -> Result<BudgetRequest, AppError> {
        self.upsert(BUDGETS_KEY, budget.clone()).await
    }
}

#[async_trait]
impl ServiceOrderStorage for LocalStore {
    async fn list_orders(&self) -> Result<Vec<ServiceOrder>, AppError> {
        self.load(ORDERS_KEY).await
    }

    async fn get_order(&self, id: &str) -> Result<Option<ServiceOrder>, AppError> {
        self.find(ORDERS_KEY, id).await
    }

    async fn create_order(&self, new: NewServiceOrder) -> Result<ServiceOrder, AppError> {
        let _guard = self.write_lock.lock().await;
        let existing: Vec<ServiceOrder> = self.load(ORDERS_KEY).await?;
        let id = ids::unique_id(ids::service_order_id, |candidate| {
            existing.iter().any(|o| o.id == candidate)
        })?;
        let order = ServiceOrder::from_new(id, ids::now(), new)?;
        self.prepend(ORDERS_KEY, order).await
    }

    async fn save_order(&self, order: &ServiceOrder) -> Result<ServiceOrder, AppError> {
        self.upsert(ORDERS_KEY, order.clone()).await
    }
}

#[async_trait]
impl ClientStorage for LocalStore {
    async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        self.load(CLIENTS_KEY).await
    }

    async fn get_client(&self, id: &str) -> Result<Option<Client>, AppError> {
        self.find(CLIENTS_KEY, id).await
    }

    async fn create_client(&self, new: NewClient) -> Result<Client, AppError> {
        let _guard = self.write_lock.lock().await;
        let id = self.fresh_numeric_id::<Client>(CLIENTS_KEY).await?;
        let client = Client::from_new(id, ids::now(), new);
        self.prepend(CLIENTS_KEY, client).await
    }

    async fn save_client(&self, client: &Client) -> Result<Client, AppError> {
        self.upsert(CLIENTS_KEY, client.clone()).await
    }
}

#[async_trait]
impl ProductStorage for LocalStore {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.load(PRODUCTS_KEY).await
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, AppError> {
        self.find(PRODUCTS_KEY, id).await
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, AppError> {
        let _guard = self.write_lock.lock().await;
        let id = self.fresh_numeric_id::<Product>(PRODUCTS_KEY).await?;
        let product = Product::from_new(id, ids::now(), new);
        self.prepend(PRODUCTS_KEY, product).await
    }

    async fn save_product(&self, product: &Product) -> Result<Product, AppError> {
        let mut product = product.clone();
        product.updated_at = ids::now();
        self.upsert(PRODUCTS_KEY, product).await
    }

    async fn adjust_stock(&self, id: &str, delta: i32) -> Result<Option<Product>, AppError> {
        let _guard = self.write_lock.lock().await;
        self.apply_stock_delta(id, delta).await
    }

    async fn delete_product(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut products: Vec<Product> = self.load(PRODUCTS_KEY).await?;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Ok(false);
        }
        self.persist(PRODUCTS_KEY, &products).await?;
        Ok(true)
    }
}

#[async_trait]
impl TransactionStorage for LocalStore {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.load(TRANSACTIONS_KEY).await
    }

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, AppError> {
        let _guard = self.write_lock.lock().await;
        self.insert_transaction(new).await
    }

    async fn find_referencing(&self, needle: &str) -> Result<Option<Transaction>, AppError> {
        let transactions: Vec<Transaction> = self.load(TRANSACTIONS_KEY).await?;
        Ok(transactions
            .into_iter()
            .find(|t| t.description.contains(needle)))
    }
}

#[async_trait]
impl SaleStorage for LocalStore {
    async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        self.load(SALES_KEY).await
    }

    async fn get_sale(&self, id: &str) -> Result<Option<Sale>, AppError> {
        self.find(SALES_KEY, id).await
    }

    async fn record_sale(&self, draft: SaleDraft) -> Result<(Sale, Transaction), AppError> {
        // Três gravações em sequência, sem rollback: cada passo já gravado permanece.
        let _guard = self.write_lock.lock().await;

        let existing: Vec<Sale> = self.load(SALES_KEY).await?;
        let mut at = ids::now();
        let id = ids::unique_id(
            || {
                let id = ids::sale_id(at);
                at += Duration::milliseconds(1);
                id
            },
            |candidate| existing.iter().any(|s| s.id == candidate),
        )?;
        let sale = self
            .prepend(SALES_KEY, draft.into_sale(id, ids::now()))
            .await?;

        for item in &sale.items {
            if self
                .apply_stock_delta(&item.product_id, -item.quantity)
                .await?
                .is_none()
            {
                tracing::warn!(
                    "Venda {}: produto {} não encontrado, estoque não baixado",
                    sale.id,
                    item.product_id
                );
            }
        }

        let transaction = self
            .insert_transaction(NewTransaction::income_for_sale(&sale))
            .await?;

        Ok((sale, transaction))
    }
}

#[async_trait]
impl ServiceCatalogStorage for LocalStore {
    async fn list_catalog(&self) -> Result<Vec<ServiceCatalogItem>, AppError> {
        self.load(CATALOG_KEY).await
    }

    async fn save_catalog_item(
        &self,
        item: ServiceCatalogItem,
    ) -> Result<ServiceCatalogItem, AppError> {
        self.upsert(CATALOG_KEY, item).await
    }

    async fn seed_catalog(&self, items: Vec<ServiceCatalogItem>) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let current: Vec<ServiceCatalogItem> = self.load(CATALOG_KEY).await?;
        if !current.is_empty() {
            return Ok(0);
        }
        self.persist(CATALOG_KEY, &items).await?;
        Ok(items.len())
    }
}
