use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{DUPLICATE_RISK_MESSAGE, RiskRepository};
use crate::{
    error::{AppError, AppResult},
    models::{NewRisk, NewZisStats, RiskItem, RiskPatch, ZisTrackingStats},
};

#[derive(Debug, Default)]
struct Tables {
    // Insertion order doubles as primary-key order for listing.
    risks: Vec<RiskItem>,
    stats: Vec<ZisTrackingStats>,
    next_stats_id: i64,
}

impl Tables {
    fn risk_exists(&self, id: &str) -> bool {
        self.risks.iter().any(|risk| risk.id == id)
    }

    fn live_risk_mut(&mut self, id: &str) -> Option<&mut RiskItem> {
        self.risks
            .iter_mut()
            .find(|risk| risk.id == id && !risk.is_deleted())
    }
}

/// Process-local repository with the same semantics as the PostgreSQL one.
/// Used by the HTTP tests and for running without a database.
#[derive(Debug, Default)]
pub struct InMemoryRiskRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRiskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RiskRepository for InMemoryRiskRepository {
    async fn init(&self) -> AppResult<()> {
        Ok(())
    }

    async fn list_risks(&self) -> AppResult<Vec<RiskItem>> {
        let risks: Vec<RiskItem> = self
            .tables
            .read()
            .await
            .risks
            .iter()
            .filter(|risk| !risk.is_deleted())
            .cloned()
            .collect();
        Ok(risks)
    }

    async fn create_risk(&self, risk: NewRisk) -> AppResult<RiskItem> {
        let mut tables = self.tables.write().await;
        if tables.risk_exists(&risk.id) {
            return Err(AppError::conflict(DUPLICATE_RISK_MESSAGE));
        }

        let created = risk.into_item(Utc::now());
        tables.risks.push(created.clone());
        Ok(created)
    }

    async fn create_risks(&self, risks: Vec<NewRisk>) -> AppResult<()> {
        let mut tables = self.tables.write().await;

        for (index, risk) in risks.iter().enumerate() {
            let repeated_in_batch = risks[..index].iter().any(|other| other.id == risk.id);
            if repeated_in_batch || tables.risk_exists(&risk.id) {
                return Err(AppError::conflict(DUPLICATE_RISK_MESSAGE));
            }
        }

        let now = Utc::now();
        tables
            .risks
            .extend(risks.into_iter().map(|risk| risk.into_item(now)));
        Ok(())
    }

    async fn live_risk_exists(&self, id: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .risks
            .iter()
            .any(|risk| risk.id == id && !risk.is_deleted()))
    }

    async fn update_risk(&self, id: &str, patch: RiskPatch) -> AppResult<Option<RiskItem>> {
        let mut tables = self.tables.write().await;
        let Some(risk) = tables.live_risk_mut(id) else {
            return Ok(None);
        };

        risk.apply(patch);
        risk.updated_at = Utc::now();
        Ok(Some(risk.clone()))
    }

    async fn delete_risk(&self, id: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(risk) = tables.live_risk_mut(id) {
            risk.deleted_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn count_risks(&self) -> AppResult<i64> {
        let count = self.tables.read().await.risks.len();
        i64::try_from(count).map_err(|_| AppError::storage("risk count out of i64 range"))
    }

    async fn count_stats(&self) -> AppResult<i64> {
        let count = self.tables.read().await.stats.len();
        i64::try_from(count).map_err(|_| AppError::storage("stats count out of i64 range"))
    }

    async fn insert_stats(&self, stats: NewZisStats) -> AppResult<ZisTrackingStats> {
        let mut tables = self.tables.write().await;
        tables.next_stats_id += 1;

        let inserted = ZisTrackingStats {
            id: tables.next_stats_id,
            total_collected: stats.total_collected,
            total_distributed: stats.total_distributed,
            donor_count: stats.donor_count,
            beneficiary_count: stats.beneficiary_count,
            updated_at: Utc::now(),
        };
        tables.stats.push(inserted.clone());
        Ok(inserted)
    }

    async fn latest_stats(&self) -> AppResult<Option<ZisTrackingStats>> {
        let latest = self
            .tables
            .read()
            .await
            .stats
            .iter()
            .max_by_key(|stats| stats.id)
            .cloned();
        Ok(latest)
    }
}
