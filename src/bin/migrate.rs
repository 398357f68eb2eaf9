use anyhow::{Context, Result};
use erm_backend::{
    config::AppConfig,
    repository::{PgRiskRepository, RiskRepository},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("failed to read configuration")?;

    let repo = PgRiskRepository::connect(
        config.database.connect_options(),
        config.database.max_connections,
    )
    .await
    .context("failed to connect to PostgreSQL")?;

    repo.init().await.context("failed to ensure schema")?;

    println!("Schema is up to date");
    Ok(())
}
