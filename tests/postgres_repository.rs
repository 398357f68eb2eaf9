use erm_backend::{
    error::AppError,
    models::{NewRisk, RiskPatch},
    repository::{PgRiskRepository, RiskRepository},
    seed::seed_if_empty,
};
use sqlx::{PgPool, postgres::PgPoolOptions};

async fn maybe_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .ok()
}

fn new_risk(id: &str) -> NewRisk {
    NewRisk {
        id: id.to_string(),
        description: "postgres risk".to_string(),
        category: "Operational".to_string(),
        impact: "Medium".to_string(),
        likelihood: "Low".to_string(),
        status: "Open".to_string(),
    }
}

#[tokio::test]
async fn postgres_repository_crud_flow() {
    let Some(pool) = maybe_pool().await else {
        eprintln!(
            "Skipping postgres_repository_crud_flow: TEST_DATABASE_URL is not set or database is unreachable."
        );
        return;
    };

    let repo = PgRiskRepository::new(pool.clone());
    repo.init().await.expect("schema should be ensured");
    repo.init().await.expect("schema bootstrap should be idempotent");

    sqlx::query("TRUNCATE TABLE risk_items, zis_tracking_stats RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("truncate should succeed");

    let created = repo
        .create_risk(new_risk("PG-001"))
        .await
        .expect("create should succeed");
    assert_eq!(created.id, "PG-001");
    assert!(created.deleted_at.is_none());

    let duplicate = repo.create_risk(new_risk("PG-001")).await.unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));

    assert!(repo.live_risk_exists("PG-001").await.unwrap());
    assert!(!repo.live_risk_exists("PG-404").await.unwrap());

    let updated = repo
        .update_risk(
            "PG-001",
            RiskPatch {
                status: Some("Closed".to_string()),
                ..RiskPatch::default()
            },
        )
        .await
        .expect("update should succeed")
        .expect("risk should exist");
    assert_eq!(updated.status, "Closed");
    assert_eq!(updated.impact, "Medium");
    assert!(updated.updated_at >= created.updated_at);

    let missing = repo
        .update_risk("PG-404", RiskPatch::default())
        .await
        .expect("update should not fail");
    assert!(missing.is_none());

    repo.delete_risk("PG-001").await.expect("delete should succeed");
    repo.delete_risk("PG-001").await.expect("second delete should succeed");
    assert!(!repo.live_risk_exists("PG-001").await.unwrap());
    assert!(repo.list_risks().await.unwrap().is_empty());
    assert_eq!(repo.count_risks().await.unwrap(), 1);

    assert!(repo.latest_stats().await.unwrap().is_none());
    sqlx::query("TRUNCATE TABLE risk_items")
        .execute(&pool)
        .await
        .expect("truncate should succeed");

    let report = seed_if_empty(&repo).await.expect("seed should succeed");
    assert_eq!(report.risks, 3);
    assert!(report.stats);

    let ids: Vec<String> = repo
        .list_risks()
        .await
        .unwrap()
        .into_iter()
        .map(|risk| risk.id)
        .collect();
    assert_eq!(ids, ["OP-001", "RP-001", "SH-001"]);

    let stats = repo
        .latest_stats()
        .await
        .unwrap()
        .expect("stats should be seeded");
    assert_eq!(stats.donor_count, 15_480);
}
