use crate::dtos::Envelope;
use crate::startup::AppState;
use axum::{extract::State, Json};

/// Liveness check. Always succeeds and reports the configured email.
pub async fn health_check(State(state): State<AppState>) -> Json<Envelope> {
    Json(Envelope::health(&state.config.official_email))
}
