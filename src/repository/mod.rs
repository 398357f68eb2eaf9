mod memory;
mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{NewRisk, NewZisStats, RiskItem, RiskPatch, ZisTrackingStats},
};

pub use memory::InMemoryRiskRepository;
pub use postgres::PgRiskRepository;

/// Message carried by [`crate::error::AppError::Conflict`] when an identifier is taken.
pub const DUPLICATE_RISK_MESSAGE: &str = "failed to create risk; the id may already exist";

#[async_trait]
pub trait RiskRepository: Send + Sync {
    /// Creates missing tables and columns.
    async fn init(&self) -> AppResult<()>;

    /// Every risk that is not soft-deleted, oldest first.
    async fn list_risks(&self) -> AppResult<Vec<RiskItem>>;

    async fn create_risk(&self, risk: NewRisk) -> AppResult<RiskItem>;

    /// Inserts all risks or none of them.
    async fn create_risks(&self, risks: Vec<NewRisk>) -> AppResult<()>;

    /// Whether a risk that is not soft-deleted carries `id`.
    async fn live_risk_exists(&self, id: &str) -> AppResult<bool>;

    /// Returns `None` when no live risk carries `id`.
    async fn update_risk(&self, id: &str, patch: RiskPatch) -> AppResult<Option<RiskItem>>;

    /// Marks the risk deleted. Unknown or already deleted ids are not an error.
    async fn delete_risk(&self, id: &str) -> AppResult<()>;

    /// Counts rows including soft-deleted ones, since those still hold their ids.
    async fn count_risks(&self) -> AppResult<i64>;

    async fn count_stats(&self) -> AppResult<i64>;

    async fn insert_stats(&self, stats: NewZisStats) -> AppResult<ZisTrackingStats>;

    /// The most recently inserted snapshot.
    async fn latest_stats(&self) -> AppResult<Option<ZisTrackingStats>>;
}
