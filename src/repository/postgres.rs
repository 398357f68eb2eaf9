use async_trait::async_trait;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use super::{DUPLICATE_RISK_MESSAGE, RiskRepository};
use crate::{
    error::{AppError, AppResult},
    models::{NewRisk, NewZisStats, RiskItem, RiskPatch, ZisTrackingStats},
    schema,
};

const UNIQUE_VIOLATION: &str = "23505";

const RISK_COLUMNS: &str =
    "id, description, category, impact, likelihood, status, created_at, updated_at, deleted_at";

const STATS_COLUMNS: &str =
    "id, total_collected, total_distributed, donor_count, beneficiary_count, updated_at";

const INSERT_RISK_SQL: &str = r#"
    INSERT INTO risk_items (id, description, category, impact, likelihood, status, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
"#;

#[derive(Clone)]
pub struct PgRiskRepository {
    pool: PgPool,
}

impl PgRiskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(options: PgConnectOptions, max_connections: u32) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            AppError::conflict(DUPLICATE_RISK_MESSAGE)
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl RiskRepository for PgRiskRepository {
    async fn init(&self) -> AppResult<()> {
        schema::ensure(&self.pool).await?;
        Ok(())
    }

    async fn list_risks(&self) -> AppResult<Vec<RiskItem>> {
        let risks = sqlx::query_as::<_, RiskItem>(&format!(
            "SELECT {RISK_COLUMNS} FROM risk_items WHERE deleted_at IS NULL ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(risks)
    }

    async fn create_risk(&self, risk: NewRisk) -> AppResult<RiskItem> {
        let created = sqlx::query_as::<_, RiskItem>(&format!(
            "{INSERT_RISK_SQL} RETURNING {RISK_COLUMNS}"
        ))
        .bind(risk.id)
        .bind(risk.description)
        .bind(risk.category)
        .bind(risk.impact)
        .bind(risk.likelihood)
        .bind(risk.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(created)
    }

    async fn create_risks(&self, risks: Vec<NewRisk>) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for risk in risks {
            sqlx::query(INSERT_RISK_SQL)
                .bind(risk.id)
                .bind(risk.description)
                .bind(risk.category)
                .bind(risk.impact)
                .bind(risk.likelihood)
                .bind(risk.status)
                .execute(&mut *tx)
                .await
                .map_err(map_insert_error)?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn live_risk_exists(&self, id: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM risk_items WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_risk(&self, id: &str, patch: RiskPatch) -> AppResult<Option<RiskItem>> {
        let updated = sqlx::query_as::<_, RiskItem>(&format!(
            r#"
            UPDATE risk_items
            SET
                description = COALESCE($2, description),
                category = COALESCE($3, category),
                impact = COALESCE($4, impact),
                likelihood = COALESCE($5, likelihood),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {RISK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.description)
        .bind(patch.category)
        .bind(patch.impact)
        .bind(patch.likelihood)
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_risk(&self, id: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE risk_items
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_risks(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM risk_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_stats(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM zis_tracking_stats")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_stats(&self, stats: NewZisStats) -> AppResult<ZisTrackingStats> {
        let inserted = sqlx::query_as::<_, ZisTrackingStats>(&format!(
            r#"
            INSERT INTO zis_tracking_stats
                (total_collected, total_distributed, donor_count, beneficiary_count, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING {STATS_COLUMNS}
            "#
        ))
        .bind(stats.total_collected)
        .bind(stats.total_distributed)
        .bind(stats.donor_count)
        .bind(stats.beneficiary_count)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn latest_stats(&self) -> AppResult<Option<ZisTrackingStats>> {
        let stats = sqlx::query_as::<_, ZisTrackingStats>(&format!(
            "SELECT {STATS_COLUMNS} FROM zis_tracking_stats ORDER BY id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(stats)
    }
}
