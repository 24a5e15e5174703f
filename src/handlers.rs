pub mod auth;
pub mod budgets;
pub mod catalog;
pub mod crm;
pub mod dashboard;
pub mod finance;
pub mod inventory;
pub mod sales;
pub mod service_orders;
pub mod settings;
