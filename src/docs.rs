// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Assistência Técnica API",
        description = "Orçamentos, ordens de serviço, estoque, vendas e caixa da assistência."
    ),
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Budgets ---
        handlers::budgets::create_budget,
        handlers::budgets::list_budgets,
        handlers::budgets::get_budget,
        handlers::budgets::update_budget,
        handlers::budgets::approve_budget,
        handlers::budgets::reject_budget,
        handlers::budgets::convert_to_service_order,
        handlers::budgets::convert_to_income,

        // --- Service Orders ---
        handlers::service_orders::create_order,
        handlers::service_orders::list_orders,
        handlers::service_orders::get_order,
        handlers::service_orders::update_order,
        handlers::service_orders::add_service,
        handlers::service_orders::remove_service,
        handlers::service_orders::add_product,
        handlers::service_orders::remove_product,
        handlers::service_orders::set_discount,

        // --- Clients ---
        handlers::crm::create_client,
        handlers::crm::list_clients,
        handlers::crm::get_client,
        handlers::crm::update_client,
        handlers::crm::get_client_history,

        // --- Inventory ---
        handlers::inventory::create_product,
        handlers::inventory::list_products,
        handlers::inventory::get_product,
        handlers::inventory::update_product,
        handlers::inventory::delete_product,
        handlers::inventory::adjust_stock,

        // --- Finance ---
        handlers::finance::create_transaction,
        handlers::finance::list_transactions,
        handlers::finance::get_cash_flow,

        // --- Sales ---
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::get_sale,

        // --- Dashboard ---
        handlers::dashboard::get_stats,

        // --- Service Catalog ---
        handlers::catalog::list_catalog,
        handlers::catalog::save_catalog_item,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::AdminSession,

            // --- Settings ---
            models::settings::Settings,

            // --- Budgets ---
            models::budget::EquipmentType,
            models::budget::BudgetStatus,
            models::budget::BudgetRequest,
            models::budget::NewBudget,
            models::budget::ApproveBudgetPayload,
            models::budget::ConvertBudgetPayload,
            models::budget::BudgetIncome,

            // --- Service Orders ---
            models::service_order::ServiceOrderStatus,
            models::service_order::PaymentStatus,
            models::service_order::EntryCondition,
            models::service_order::ServiceItem,
            models::service_order::OrderProductLine,
            models::service_order::ServiceOrder,
            models::service_order::NewServiceOrder,
            models::service_order::AddServicePayload,
            models::service_order::AddProductPayload,
            models::service_order::SetDiscountPayload,

            // --- Clients ---
            models::crm::Client,
            models::crm::NewClient,
            models::crm::ClientHistory,

            // --- Inventory ---
            models::inventory::Product,
            models::inventory::NewProduct,
            models::inventory::StockAdjustmentPayload,

            // --- Finance ---
            models::finance::TransactionType,
            models::finance::Transaction,
            models::finance::NewTransaction,
            models::finance::CashFlowStats,

            // --- Sales ---
            models::sales::PaymentMethod,
            models::sales::SaleStatus,
            models::sales::SaleItem,
            models::sales::Sale,
            models::sales::NewSaleItem,
            models::sales::NewSale,
            models::sales::SaleReceipt,

            // --- Dashboard ---
            models::dashboard::DashboardStats,

            // --- Service Catalog ---
            models::catalog::ServiceCategory,
            models::catalog::ServiceCatalogItem,
        )
    ),
    tags(
        (name = "Auth", description = "Login do administrador"),
        (name = "Settings", description = "Dados da empresa"),
        (name = "Budgets", description = "Pedidos de orçamento e conversões"),
        (name = "Service Orders", description = "Ordens de serviço, itens e desconto"),
        (name = "Clients", description = "Cadastro e histórico de clientes"),
        (name = "Inventory", description = "Produtos e estoque"),
        (name = "Finance", description = "Lançamentos e fluxo de caixa"),
        (name = "Sales", description = "Vendas de balcão"),
        (name = "Dashboard", description = "Indicadores gerenciais"),
        (name = "Service Catalog", description = "Tabela de preços de serviços")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_protected_and_public_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/budgets"));
        assert!(paths.contains_key("/api/service-orders/{id}/products/{line_id}"));
        assert!(paths.contains_key("/api/transactions/cash-flow"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("api_jwt")));
    }
}
