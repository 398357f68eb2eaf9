use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reporting period advertised by the public statistics endpoint.
pub const PUBLIC_STATS_PERIOD: &str = "2024-Current";
/// Audit status advertised by the public statistics endpoint.
pub const PUBLIC_STATS_STATUS: &str = "Audited";

/// A tracked operational, reputational or compliance risk.
///
/// `category`, `impact`, `likelihood` and `status` are free-form strings; the
/// dashboard uses values such as `Operational`, `High` and `Open` but nothing
/// here enforces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RiskItem {
    pub id: String,
    pub description: String,
    pub category: String,
    pub impact: String,
    pub likelihood: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RiskItem {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Overwrites every field the patch supplies.
    pub fn apply(&mut self, patch: RiskPatch) {
        let RiskPatch {
            description,
            category,
            impact,
            likelihood,
            status,
        } = patch;

        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(impact) = impact {
            self.impact = impact;
        }
        if let Some(likelihood) = likelihood {
            self.likelihood = likelihood;
        }
        if let Some(status) = status {
            self.status = status;
        }
    }
}

/// Body of `POST /api/v1/risks`. Only `id` is mandatory; timestamps sent by
/// the client are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewRisk {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub likelihood: String,
    #[serde(default)]
    pub status: String,
}

impl NewRisk {
    pub fn into_item(self, now: DateTime<Utc>) -> RiskItem {
        RiskItem {
            id: self.id,
            description: self.description,
            category: self.category,
            impact: self.impact,
            likelihood: self.likelihood,
            status: self.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Body of `PUT /api/v1/risks/:id`. Absent or `null` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RiskPatch {
    pub description: Option<String>,
    pub category: Option<String>,
    pub impact: Option<String>,
    pub likelihood: Option<String>,
    pub status: Option<String>,
}

/// Aggregate donation-collection snapshot. The row with the highest `id` is
/// the current one.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ZisTrackingStats {
    pub id: i64,
    pub total_collected: f64,
    pub total_distributed: f64,
    pub donor_count: i32,
    pub beneficiary_count: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewZisStats {
    pub total_collected: f64,
    pub total_distributed: f64,
    pub donor_count: i32,
    pub beneficiary_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicZisStats {
    pub period: String,
    pub data: PublicZisFigures,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicZisFigures {
    pub collection_total: f64,
    pub distribution_total: f64,
    pub beneficiaries: i32,
    pub donors: i32,
}

impl From<ZisTrackingStats> for PublicZisStats {
    fn from(stats: ZisTrackingStats) -> Self {
        Self {
            period: PUBLIC_STATS_PERIOD.to_string(),
            data: PublicZisFigures {
                collection_total: stats.total_collected,
                distribution_total: stats.total_distributed,
                beneficiaries: stats.beneficiary_count,
                donors: stats.donor_count,
            },
            status: PUBLIC_STATS_STATUS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> RiskItem {
        NewRisk {
            id: "OP-001".to_string(),
            description: "old".to_string(),
            category: "Operational".to_string(),
            impact: "High".to_string(),
            likelihood: "Medium".to_string(),
            status: "Open".to_string(),
        }
        .into_item(Utc::now())
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut risk = sample();
        risk.apply(RiskPatch {
            status: Some("Closed".to_string()),
            ..RiskPatch::default()
        });

        assert_eq!(risk.status, "Closed");
        assert_eq!(risk.description, "old");
        assert_eq!(risk.impact, "High");
    }

    #[test]
    fn patch_null_is_treated_as_absent() {
        let patch: RiskPatch =
            serde_json::from_value(json!({ "status": null, "impact": "Low" })).unwrap();
        assert_eq!(patch.status, None);
        assert_eq!(patch.impact.as_deref(), Some("Low"));

        let empty: RiskPatch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, RiskPatch::default());
    }

    #[test]
    fn new_risk_requires_id_and_defaults_the_rest() {
        let missing = serde_json::from_value::<NewRisk>(json!({ "description": "x" }));
        assert!(missing.is_err());

        let minimal: NewRisk = serde_json::from_value(json!({ "id": "RP-9" })).unwrap();
        assert_eq!(minimal.id, "RP-9");
        assert!(minimal.status.is_empty());
    }

    #[test]
    fn deletion_marker_is_never_serialized() {
        let mut risk = sample();
        risk.deleted_at = Some(Utc::now());

        let value = serde_json::to_value(&risk).unwrap();
        assert!(value.get("deleted_at").is_none());
        assert!(value.get("created_at").is_some());
        assert!(risk.is_deleted());
    }

    #[test]
    fn public_stats_are_reshaped() {
        let public = PublicZisStats::from(ZisTrackingStats {
            id: 1,
            total_collected: 925_000_000.0,
            total_distributed: 710_000_000.0,
            donor_count: 15_480,
            beneficiary_count: 8_950,
            updated_at: Utc::now(),
        });

        let value = serde_json::to_value(&public).unwrap();
        assert_eq!(value["period"], "2024-Current");
        assert_eq!(value["status"], "Audited");
        assert_eq!(value["data"]["collection_total"], 925_000_000.0);
        assert_eq!(value["data"]["donors"], 15_480);
        assert_eq!(value["data"]["beneficiaries"], 8_950);
    }
}
