use crate::services::{build_prompt, record_tafsir_request};
use crate::startup::AppState;
use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::time::Instant;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TafsirRequest {
    /// "chapter:verse", e.g. "1:2"
    #[validate(length(min = 1, message = "verse_key cannot be empty"))]
    pub verse_key: String,
    #[validate(length(min = 1, message = "verse_text cannot be empty"))]
    pub verse_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TafsirResponse {
    pub reference: String,
    pub text: String,
    pub tafsir: String,
}

/// Generate commentary for a caller-supplied verse.
///
/// The verse table is not consulted; reference and text are echoed back
/// exactly as received.
#[tracing::instrument(skip(state, payload))]
pub async fn get_tafsir(
    State(state): State<AppState>,
    payload: WithRejection<Json<TafsirRequest>, AppError>,
) -> Result<Json<TafsirResponse>, AppError> {
    let WithRejection(Json(request), _) = payload;
    request.validate()?;

    let prompt = build_prompt(&request.verse_key, &request.verse_text);

    let started = Instant::now();
    let result = state.commentary.generate_commentary(&prompt).await;
    let elapsed = started.elapsed();

    let tafsir = match result {
        Ok(tafsir) => {
            record_tafsir_request("success", elapsed);
            tracing::info!(
                verse_key = %request.verse_key,
                model = state.commentary.model(),
                elapsed_secs = elapsed.as_secs_f64(),
                "Tafsir generated"
            );
            tafsir
        }
        Err(e) => {
            record_tafsir_request("upstream_error", elapsed);
            tracing::error!(
                verse_key = %request.verse_key,
                model = state.commentary.model(),
                error = %e,
                "Commentary generation failed"
            );
            return Err(AppError::UpstreamError(format!("LLM Error: {}", e)));
        }
    };

    Ok(Json(TafsirResponse {
        reference: request.verse_key,
        text: request.verse_text,
        tafsir,
    }))
}
