//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Callers only ever see a generic message per error class; the full error
//! is logged here.

use axum::response::{IntoResponse, Response};

use parley_types::error::{AuthError, ErrorClass, GatewayError, TurnError};

use crate::http::response::ApiResponse;

#[derive(Debug)]
pub enum AppError {
    /// Failure from a start/answer/end pipeline.
    Turn(TurnError),
    /// Failure while reporting provider status.
    Status(GatewayError),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Turn(TurnError::Auth(e))
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        AppError::Status(e)
    }
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::Turn(TurnError::BadRequest(message.into()))
    }

    /// Error code and generic message reported to the caller.
    pub fn code_and_message(&self) -> (&'static str, &'static str) {
        match self {
            AppError::Turn(TurnError::ConversationEnded) => {
                ("CONFLICT", "The interview has already ended")
            }
            AppError::Turn(e) => match e.class() {
                ErrorClass::Validation => ("VALIDATION_ERROR", "Invalid request"),
                ErrorClass::Auth => ("UNAUTHORIZED", "Invalid credentials"),
                ErrorClass::Upstream => ("UPSTREAM_ERROR", "Voice provider request failed"),
                ErrorClass::Store => ("STORE_ERROR", "Conversation storage failed"),
                ErrorClass::Internal => ("INTERNAL_ERROR", "Internal server error"),
            },
            AppError::Status(GatewayError::Misconfigured(_)) => {
                ("INTERNAL_ERROR", "Internal server error")
            }
            AppError::Status(_) => ("UPSTREAM_ERROR", "Provider status check failed"),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Turn(e) => write!(f, "{e}"),
            AppError::Status(e) => write!(f, "{e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = self.code_and_message();
        let request_id = uuid::Uuid::now_v7().to_string();

        match code {
            "VALIDATION_ERROR" | "UNAUTHORIZED" | "CONFLICT" => {
                tracing::info!(%request_id, code, error = %self, "request rejected");
            }
            _ => tracing::error!(%request_id, code, error = %self, "request failed"),
        }

        ApiResponse::error(code, message, request_id, 0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use parley_types::error::{ProviderError, RepositoryError};

    fn status(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_validation_is_400() {
        assert_eq!(status(AppError::bad_request("no file")), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_failures_are_401() {
        assert_eq!(status(AuthError::Mismatch), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::NotFound), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(AuthError::Malformed("missing header".into())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_ended_conversation_is_409() {
        assert_eq!(status(TurnError::ConversationEnded), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upstream_and_store_are_500() {
        assert_eq!(
            status(TurnError::EmptyTranscript),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(TurnError::Store(RepositoryError::Connection)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(GatewayError::StatusFailed(ProviderError::RateLimited)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_is_generic() {
        let err = AppError::from(TurnError::Store(RepositoryError::Query(
            "no such table: turns".into(),
        )));
        let (code, message) = err.code_and_message();
        assert_eq!(code, "STORE_ERROR");
        assert!(!message.contains("turns"));
    }
}
