//! GET /chat/status - Backend, API key and upstream status (no auth).

use axum::Json;
use axum::extract::State;

use parley_types::voice::StatusReport;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

pub async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatusReport>>, AppError> {
    let timer = RequestTimer::start();
    let report = state.status.report().await?;
    Ok(Json(ApiResponse::timed(report, &timer)))
}
