//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use assistencia_backend::{config::AppState, routes::app_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logger: RUST_LOG manda; sem ele, nível info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().await?;

    // Migrações só existem no backend remoto
    if let Some(pool) = &app_state.db_pool {
        sqlx::migrate!().run(pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    }

    if app_state.config.seed_service_catalog {
        app_state.catalog_service.seed_defaults().await?;
    }

    let addr = app_state.config.bind_addr.clone();
    let app = app_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
