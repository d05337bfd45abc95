use crate::startup::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub quran_verses_loaded: usize,
}

/// Liveness plus the size of the verse table. The table is loaded before the
/// listener starts, so reaching this handler means startup succeeded.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        quran_verses_loaded: state.verses.len(),
    })
}
