use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{error, info};

use crate::{
    error::{AppError, AppResult},
    extract::JsonBody,
    models::{ApiMessage, NewRisk, PublicZisStats, RiskItem, RiskPatch},
    state::AppState,
};

pub const RISK_NOT_FOUND_MESSAGE: &str = "risk not found";
pub const RISK_DELETED_MESSAGE: &str = "risk deleted";
pub const STATS_UNAVAILABLE_MESSAGE: &str = "stats data not available";

pub async fn healthcheck() -> Json<ApiMessage> {
    Json(ApiMessage::new("ok"))
}

pub async fn list_risks(State(state): State<AppState>) -> AppResult<Json<Vec<RiskItem>>> {
    let risks = state.repo.list_risks().await?;
    Ok(Json(risks))
}

pub async fn create_risk(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewRisk>,
) -> AppResult<(StatusCode, Json<RiskItem>)> {
    let risk = state.repo.create_risk(payload).await?;
    info!(risk_id = %risk.id, "risk created");

    Ok((StatusCode::CREATED, Json(risk)))
}

/// Looks the risk up before reading the body, so an unknown id is a 404
/// whatever the payload.
pub async fn update_risk(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<RiskItem>> {
    if !state.repo.live_risk_exists(&id).await? {
        return Err(AppError::not_found(RISK_NOT_FOUND_MESSAGE));
    }

    let Json(patch) = Json::<RiskPatch>::from_bytes(&body)?;

    // The row can still be deleted between the lookup and the write.
    let risk = state
        .repo
        .update_risk(&id, patch)
        .await?
        .ok_or_else(|| AppError::not_found(RISK_NOT_FOUND_MESSAGE))?;

    Ok(Json(risk))
}

pub async fn delete_risk(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiMessage>> {
    state.repo.delete_risk(&id).await?;
    info!(risk_id = %id, "risk deleted");

    Ok(Json(ApiMessage::new(RISK_DELETED_MESSAGE)))
}

pub async fn public_zis_stats(State(state): State<AppState>) -> AppResult<Json<PublicZisStats>> {
    let stats = state
        .repo
        .latest_stats()
        .await
        .map_err(|err| {
            error!(error = %err, "failed to load zis stats");
            AppError::unavailable(STATS_UNAVAILABLE_MESSAGE)
        })?
        .ok_or_else(|| AppError::unavailable(STATS_UNAVAILABLE_MESSAGE))?;

    Ok(Json(PublicZisStats::from(stats)))
}
