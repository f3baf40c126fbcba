use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::translate::{TranslateRequest, TranslateResponse, Verdict};

/// `POST /translate`
///
/// Validates the body, runs the intent filter, then makes exactly one model
/// call. Upstream failures are logged here and reach the client only as a
/// generic message.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, AppError> {
    let request_id = Uuid::new_v4();

    let Json(request) = payload.map_err(|rejection| {
        warn!(%request_id, "Invalid translate body: {}", rejection.body_text());
        AppError::Validation
    })?;

    let prompt = request.into_prompt().ok_or_else(|| {
        debug!(%request_id, "Empty prompt");
        AppError::Validation
    })?;

    if let Verdict::Reject(reason) = state.intent_filter.check(&prompt) {
        info!(%request_id, "Prompt rejected by intent filter: {}", reason);
        return Err(AppError::PolicyRejection(reason));
    }

    debug!(%request_id, "Translating prompt ({} chars)", prompt.chars().count());

    let translated = state
        .llm
        .generate(&prompt, &state.config.llm.system_instruction)
        .await
        .map_err(|err| {
            error!(%request_id, "Translation error: {}", err);
            AppError::Upstream(err)
        })?;

    Ok(Json(TranslateResponse {
        translated: translated.trim().to_string(),
    }))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.config.llm.model,
        "intent_filter": state.intent_filter.mode().to_string(),
    }))
}
