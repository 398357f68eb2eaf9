use std::sync::Arc;

use anyhow::{Context, Result};
use erm_backend::{
    build_router,
    config::AppConfig,
    repository::{PgRiskRepository, RiskRepository},
    seed::seed_if_empty,
    state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("failed to load application configuration")?;

    let repository = PgRiskRepository::connect(
        config.database.connect_options(),
        config.database.max_connections,
    )
    .await
    .context("failed to connect to PostgreSQL")?;
    info!(
        host = %config.database.host,
        database = %config.database.name,
        "database connected"
    );

    repository
        .init()
        .await
        .context("failed to initialize database schema")?;

    let report = seed_if_empty(&repository)
        .await
        .context("failed to seed placeholder data")?;
    info!(risks = report.risks, stats = report.stats, "seed check finished");

    let repository: Arc<dyn RiskRepository> = Arc::new(repository);
    let app = build_router(AppState::new(repository), config.allow_origin.clone());

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "erm backend started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("erm_backend=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
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

    info!("shutdown signal received");
}
