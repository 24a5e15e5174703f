pub mod storage;
pub mod local;

pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod budget_repo;
pub use budget_repo::BudgetRepository;
pub mod service_order_repo;
pub use service_order_repo::ServiceOrderRepository;
pub mod crm_repo;
pub use crm_repo::ClientRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;

pub use storage::Repositories;
