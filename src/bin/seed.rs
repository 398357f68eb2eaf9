use anyhow::{Context, Result};
use erm_backend::{
    config::AppConfig,
    repository::{PgRiskRepository, RiskRepository},
    seed::seed_if_empty,
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

    let report = seed_if_empty(&repo)
        .await
        .context("failed to insert seed data")?;

    println!(
        "Seeded {} risk(s); stats snapshot {}",
        report.risks,
        if report.stats { "inserted" } else { "already present" }
    );
    Ok(())
}
