//! Interview endpoints.
//!
//! - POST /chat/start  - Start an interview; returns id, secret and greeting.
//! - POST /chat/answer - Answer with a recorded audio file (multipart `file`).
//! - GET  /chat/end    - Close the interview with feedback.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};

use parley_types::interview::{AnswerOutcome, EndOutcome, StartInterview, StartOutcome};
use parley_types::voice::AudioUpload;

use crate::http::error::AppError;
use crate::http::extractors::auth::BasicCredentials;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Multipart field carrying the recorded answer.
const AUDIO_FIELD: &str = "file";

/// POST /chat/start
pub async fn start(
    State(state): State<AppState>,
    payload: Result<Json<StartInterview>, JsonRejection>,
) -> Result<Json<ApiResponse<StartOutcome>>, AppError> {
    let timer = RequestTimer::start();
    let Json(request) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;

    let outcome = state.orchestrator.start(request).await?;
    Ok(Json(ApiResponse::timed(outcome, &timer)))
}

/// POST /chat/answer
pub async fn answer(
    State(state): State<AppState>,
    BasicCredentials(credentials): BasicCredentials,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<AnswerOutcome>>, AppError> {
    let timer = RequestTimer::start();

    let upload = match multipart {
        Ok(multipart) => read_audio_field(multipart).await,
        Err(e) => {
            tracing::debug!(error = %e, "request is not multipart");
            None
        }
    };

    let outcome = state.orchestrator.answer(&credentials, upload).await?;
    Ok(Json(ApiResponse::timed(outcome, &timer)))
}

/// GET /chat/end
pub async fn end(
    State(state): State<AppState>,
    BasicCredentials(credentials): BasicCredentials,
) -> Result<Json<ApiResponse<EndOutcome>>, AppError> {
    let timer = RequestTimer::start();
    let outcome = state.orchestrator.end(&credentials).await?;
    Ok(Json(ApiResponse::timed(outcome, &timer)))
}

/// Pull the audio field out of a multipart body.
///
/// An unreadable body counts as a missing upload; the orchestrator reports
/// it after authentication.
async fn read_audio_field(mut multipart: Multipart) -> Option<AudioUpload> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read multipart body");
                return None;
            }
        };

        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("answer.webm").to_string();
        let content_type = field.content_type().map(str::to_string);
        return match field.bytes().await {
            Ok(bytes) => Some(AudioUpload {
                bytes: bytes.to_vec(),
                filename,
                content_type,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "failed to read audio field");
                None
            }
        };
    }
}
