use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{
        create_risk, delete_risk, healthcheck, list_risks, public_zis_stats, update_risk,
    },
    state::AppState,
};

/// Single-origin policy for the admin dashboard. Credentials are allowed, so
/// origin, methods and headers must all be explicit.
pub fn cors_layer(allow_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
}

pub fn build_router(state: AppState, allow_origin: HeaderValue) -> Router {
    let admin = Router::new()
        .route("/risks", get(list_risks).post(create_risk))
        .route("/risks/:id", put(update_risk).delete(delete_risk));

    let public = Router::new().route("/zis-stats", get(public_zis_stats));

    Router::new()
        .route("/health", get(healthcheck))
        .nest("/api/v1", admin)
        .nest("/api/public", public)
        .layer(cors_layer(allow_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
