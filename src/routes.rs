// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{config::AppState, docs, handlers, middleware::auth::auth_guard};

pub fn app_router(app_state: AppState) -> Router {
    let auth_layer = axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    // Rotas públicas. O POST de orçamentos é o formulário do site;
    // a listagem no mesmo caminho exige login.
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/budgets",
            get(handlers::budgets::list_budgets)
                .route_layer(auth_layer.clone())
                .merge(post(handlers::budgets::create_budget)),
        );

    // Tudo abaixo exige o token do administrador
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        // Orçamentos
        .route(
            "/budgets/{id}",
            get(handlers::budgets::get_budget).put(handlers::budgets::update_budget),
        )
        .route("/budgets/{id}/approve", post(handlers::budgets::approve_budget))
        .route("/budgets/{id}/reject", post(handlers::budgets::reject_budget))
        .route(
            "/budgets/{id}/service-order",
            post(handlers::budgets::convert_to_service_order),
        )
        .route("/budgets/{id}/income", post(handlers::budgets::convert_to_income))
        // Ordens de serviço
        .route(
            "/service-orders",
            post(handlers::service_orders::create_order).get(handlers::service_orders::list_orders),
        )
        .route(
            "/service-orders/{id}",
            get(handlers::service_orders::get_order).put(handlers::service_orders::update_order),
        )
        .route(
            "/service-orders/{id}/services",
            post(handlers::service_orders::add_service),
        )
        .route(
            "/service-orders/{id}/services/{line_id}",
            delete(handlers::service_orders::remove_service),
        )
        .route(
            "/service-orders/{id}/products",
            post(handlers::service_orders::add_product),
        )
        .route(
            "/service-orders/{id}/products/{line_id}",
            delete(handlers::service_orders::remove_product),
        )
        .route(
            "/service-orders/{id}/discount",
            put(handlers::service_orders::set_discount),
        )
        // Clientes
        .route(
            "/clients",
            post(handlers::crm::create_client).get(handlers::crm::list_clients),
        )
        .route(
            "/clients/{id}",
            get(handlers::crm::get_client).put(handlers::crm::update_client),
        )
        .route("/clients/{id}/history", get(handlers::crm::get_client_history))
        // Estoque
        .route(
            "/products",
            post(handlers::inventory::create_product).get(handlers::inventory::list_products),
        )
        .route(
            "/products/{id}",
            get(handlers::inventory::get_product)
                .put(handlers::inventory::update_product)
                .delete(handlers::inventory::delete_product),
        )
        .route("/products/{id}/stock", post(handlers::inventory::adjust_stock))
        // Caixa
        .route(
            "/transactions",
            post(handlers::finance::create_transaction).get(handlers::finance::list_transactions),
        )
        .route("/transactions/cash-flow", get(handlers::finance::get_cash_flow))
        // Vendas
        .route(
            "/sales",
            post(handlers::sales::create_sale).get(handlers::sales::list_sales),
        )
        .route("/sales/{id}", get(handlers::sales::get_sale))
        .route("/dashboard/stats", get(handlers::dashboard::get_stats))
        .route(
            "/service-catalog",
            get(handlers::catalog::list_catalog).put(handlers::catalog::save_catalog_item),
        )
        .route_layer(auth_layer);

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .merge(docs::swagger_ui())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app_router(AppState::for_tests())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn openapi_json_is_public_under_api_docs() {
        let (status, body) = get_json("/api/docs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["openapi"].is_string());
        assert!(body["paths"]["/api/budgets"].is_object());
    }

    #[tokio::test]
    async fn admin_routes_need_a_token() {
        for uri in ["/api/clients", "/api/budgets", "/api/dashboard/stats"] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body["success"], false);
        }
    }
}
