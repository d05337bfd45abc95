use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct VerseResponse {
    pub reference: String,
    pub text: String,
}

#[tracing::instrument(skip(state))]
pub async fn get_verse(
    State(state): State<AppState>,
    Path(verse_key): Path<String>,
) -> Result<Json<VerseResponse>, AppError> {
    let text = state
        .verses
        .lookup(&verse_key)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Verse {} not found", verse_key)))?
        .to_string();

    Ok(Json(VerseResponse {
        reference: verse_key,
        text,
    }))
}
