use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::llm::LlmError;
use crate::translate::prompt::{EMPTY_PROMPT_MESSAGE, REFUSAL_MESSAGE, TRANSLATION_FAILED_MESSAGE};
use crate::translate::{ErrorResponse, RejectReason, TranslateResponse};

/// Request-level failures and how they surface to the client
#[derive(Debug, Error)]
pub enum AppError {
    #[error("empty or malformed translation request")]
    Validation,

    #[error("prompt rejected by intent filter: {0}")]
    PolicyRejection(RejectReason),

    #[error("translation failed: {0}")]
    Upstream(#[from] LlmError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation | AppError::PolicyRejection(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Validation => (
                status,
                Json(ErrorResponse {
                    error: EMPTY_PROMPT_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            // Refusals keep the success shape so the frontend shows them inline
            AppError::PolicyRejection(_) => (
                status,
                Json(TranslateResponse {
                    translated: REFUSAL_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            // Detail is logged by the handler, never sent to the client
            AppError::Upstream(_) => (
                status,
                Json(ErrorResponse {
                    error: TRANSLATION_FAILED_MESSAGE.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
