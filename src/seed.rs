//! Placeholder rows inserted on first start.

use tracing::info;

use crate::{
    error::AppResult,
    models::{NewRisk, NewZisStats},
    repository::RiskRepository,
};

/// What [`seed_if_empty`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub risks: usize,
    pub stats: bool,
}

pub fn default_risks() -> Vec<NewRisk> {
    vec![
        NewRisk {
            id: "OP-001".to_string(),
            description: "Inaccurate determination of the eight asnaf (eligible recipient groups)"
                .to_string(),
            category: "Operational".to_string(),
            impact: "High".to_string(),
            likelihood: "Medium".to_string(),
            status: "Open".to_string(),
        },
        NewRisk {
            id: "RP-001".to_string(),
            description: "Negative campaign on social media".to_string(),
            category: "Reputation".to_string(),
            impact: "Critical".to_string(),
            likelihood: "Medium".to_string(),
            status: "Monitoring".to_string(),
        },
        NewRisk {
            id: "SH-001".to_string(),
            description: "ZIS fund investment instrument not compliant with the sharia board fatwa"
                .to_string(),
            category: "ShariaCompliance".to_string(),
            impact: "Critical".to_string(),
            likelihood: "Low".to_string(),
            status: "Open".to_string(),
        },
    ]
}

pub fn default_stats() -> NewZisStats {
    NewZisStats {
        total_collected: 925_000_000.0,
        total_distributed: 710_000_000.0,
        donor_count: 15_480,
        beneficiary_count: 8_950,
    }
}

/// Seeds each table independently, and only when it has no rows at all.
pub async fn seed_if_empty(repo: &dyn RiskRepository) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    if repo.count_risks().await? == 0 {
        let risks = default_risks();
        report.risks = risks.len();
        repo.create_risks(risks).await?;
        info!(rows = report.risks, "seeded risk_items");
    }

    if repo.count_stats().await? == 0 {
        repo.insert_stats(default_stats()).await?;
        report.stats = true;
        info!("seeded zis_tracking_stats");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRiskRepository;

    #[tokio::test]
    async fn seeds_empty_tables_once() {
        let repo = InMemoryRiskRepository::new();

        let first = seed_if_empty(&repo).await.expect("seed should succeed");
        assert_eq!(first, SeedReport { risks: 3, stats: true });

        let second = seed_if_empty(&repo).await.expect("reseed should succeed");
        assert_eq!(second, SeedReport::default());

        let ids: Vec<String> = repo
            .list_risks()
            .await
            .unwrap()
            .into_iter()
            .map(|risk| risk.id)
            .collect();
        assert_eq!(ids, ["OP-001", "RP-001", "SH-001"]);
    }

    #[tokio::test]
    async fn soft_deleted_rows_prevent_reseeding() {
        let repo = InMemoryRiskRepository::new();
        seed_if_empty(&repo).await.unwrap();
        for risk in default_risks() {
            repo.delete_risk(&risk.id).await.unwrap();
        }

        let report = seed_if_empty(&repo).await.expect("seed should not conflict");
        assert_eq!(report.risks, 0);
        assert!(repo.list_risks().await.unwrap().is_empty());
    }
}
