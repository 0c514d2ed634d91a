use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use fyyur_server::config::Config;
use fyyur_server::db;
use fyyur_server::routes::create_routes;
use fyyur_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    let pool = db::connect(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Successfully connected to database");

    db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations run successfully");

    let listener = TcpListener::bind(config.bind_target())
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    let app = create_routes(AppState::new(pool, config));

    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}
