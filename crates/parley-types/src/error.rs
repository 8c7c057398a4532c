use thiserror::Error;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from verifying a caller's identity and secret.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed credentials: {0}")]
    Malformed(String),

    #[error("chat user not found")]
    NotFound,

    #[error("secret does not match")]
    Mismatch,

    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    #[error("secret hashing failed: {0}")]
    Hashing(String),
}

/// Errors from AI provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("capability not supported: {0}")]
    Unsupported(String),

    #[error("provider returned an empty result")]
    EmptyResult,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors from SSML extraction and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("input does not contain both <speak and </speak> tags")]
    MalformedSsml,

    #[error("ssml text differs from the original text")]
    SemanticMismatch,
}

/// Errors from the provider gateway, tagged by the stage that failed.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transcription failed: {0}")]
    TranscriptionFailed(#[source] ProviderError),

    #[error("completion failed: {0}")]
    CompletionFailed(#[source] ProviderError),

    #[error("speech synthesis failed: {0}")]
    SynthesisFailed(#[source] ProviderError),

    #[error("status check failed: {0}")]
    StatusFailed(#[source] ProviderError),

    #[error("gateway misconfigured: {0}")]
    Misconfigured(String),
}

/// Coarse error class used to pick the status reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Auth,
    Upstream,
    Store,
    Internal,
}

/// Errors from the start/answer/end pipelines.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("conversation already ended")]
    ConversationEnded,

    #[error("transcription produced no text")]
    EmptyTranscript,

    #[error("completion produced no text")]
    EmptyCompletion,

    #[error(transparent)]
    Upstream(#[from] GatewayError),

    #[error("store failure: {0}")]
    Store(#[from] RepositoryError),
}

impl TurnError {
    /// Classify the error for reporting.
    pub fn class(&self) -> ErrorClass {
        match self {
            TurnError::BadRequest(_) | TurnError::ConversationEnded => ErrorClass::Validation,
            TurnError::Auth(AuthError::Unavailable(_)) => ErrorClass::Store,
            TurnError::Auth(AuthError::Hashing(_)) => ErrorClass::Internal,
            TurnError::Auth(_) => ErrorClass::Auth,
            TurnError::EmptyTranscript | TurnError::EmptyCompletion => ErrorClass::Upstream,
            TurnError::Upstream(GatewayError::Misconfigured(_)) => ErrorClass::Internal,
            TurnError::Upstream(_) => ErrorClass::Upstream,
            TurnError::Store(_) => ErrorClass::Store,
        }
    }
}
