//! Basic credentials extractor.
//!
//! Parses `Authorization: Basic base64(identity:secret)`. Verification
//! against the stored hash happens in the orchestrator, so extraction only
//! rejects malformed headers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use parley_core::auth::Credentials;
use parley_types::error::AuthError;

use crate::http::error::AppError;

/// Credentials presented by the caller, not yet verified.
pub struct BasicCredentials(pub Credentials);

impl<S: Send + Sync> FromRequestParts<S> for BasicCredentials {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| AuthError::Malformed("non-ASCII Authorization header".into()))
            })
            .transpose()?;

        Ok(BasicCredentials(Credentials::from_basic_header(header)?))
    }
}
