use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{info, warn};

use price_list_service::api::create_router;
use price_list_service::app::AppState;
use price_list_service::config::AppConfig;
use price_list_service::domain::UserRepository;
use price_list_service::infra::{PostgresClient, init_metrics, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);

    if let Some(addr) = config.metrics_addr {
        init_metrics(addr).context("Failed to start metrics exporter")?;
    }

    info!(
        currencies = ?config.exchange_rates.currencies().collect::<Vec<_>>(),
        "Exchange rate table loaded"
    );

    let db = PostgresClient::new(
        config.database.connect_options(),
        config.database.pool_config(),
    )
    .await
    .context("Failed to connect to PostgreSQL")?;
    let db = Arc::new(db);
    db.health_check()
        .await
        .context("PostgreSQL health check failed")?;

    let app_state = Arc::new(AppState::new(
        db.clone(),
        db,
        Arc::clone(&config.exchange_rates),
    ));
    let router = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
