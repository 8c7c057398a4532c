//! Caller credentials carried by the `Authorization: Basic` header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use parley_types::error::AuthError;

use std::fmt;

/// An identity/secret pair supplied by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identity: String,
    secret: String,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }

    /// Parse the value of an `Authorization` header.
    ///
    /// Expects `Basic base64(identity:secret)` where both parts are
    /// non-empty and the decoded payload contains exactly one `:`.
    pub fn from_basic_header(header: Option<&str>) -> Result<Self, AuthError> {
        let header = header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| AuthError::Malformed("missing authorization header".to_string()))?;

        let (scheme, token) = header
            .split_once(' ')
            .ok_or_else(|| AuthError::Malformed("missing authorization scheme".to_string()))?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::Malformed(format!(
                "unsupported authorization scheme '{scheme}'"
            )));
        }

        let decoded = STANDARD
            .decode(token.trim())
            .map_err(|e| AuthError::Malformed(format!("invalid base64 token: {e}")))?;
        let payload = String::from_utf8(decoded)
            .map_err(|_| AuthError::Malformed("token is not valid UTF-8".to_string()))?;

        let parts: Vec<&str> = payload.split(':').collect();
        match parts.as_slice() {
            [identity, secret] if !identity.is_empty() && !secret.is_empty() => {
                Ok(Self::new(*identity, *secret))
            }
            _ => Err(AuthError::Malformed(
                "token must be identity:secret".to_string(),
            )),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}
