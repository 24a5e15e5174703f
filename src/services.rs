pub mod auth;
pub mod budget_service;
pub mod catalog_service;
pub mod crm_service;
pub mod dashboard_service;
pub mod finance_service;
pub mod inventory_service;
pub mod sales_service;
pub mod service_order_service;

pub use auth::AuthService;
pub use budget_service::BudgetService;
pub use catalog_service::CatalogService;
pub use crm_service::ClientService;
pub use dashboard_service::DashboardService;
pub use finance_service::FinanceService;
pub use inventory_service::InventoryService;
pub use sales_service::SalesService;
pub use service_order_service::ServiceOrderService;
