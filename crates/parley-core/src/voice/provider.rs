//! VoiceProvider trait definition.
//!
//! Every AI backend (OpenAI, ElevenLabs, ...) implements this trait and
//! declares what it supports through [`ProviderCapabilities`]. Operations
//! outside the declared set keep the default bodies, which return
//! `ProviderError::Unsupported`.

use parley_types::error::ProviderError;
use parley_types::language::Language;
use parley_types::voice::{AudioUpload, Message, ProviderCapabilities, UpstreamStatus};

/// Trait for voice-capable AI provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in parley-infra (e.g., `OpenAiVoiceProvider`).
pub trait VoiceProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "elevenlabs").
    fn name(&self) -> &str;

    /// What this provider supports.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Transcribe uploaded speech into text.
    fn transcribe(
        &self,
        _audio: &AudioUpload,
        _language: Language,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send {
        async { Err(ProviderError::Unsupported("transcribe".to_string())) }
    }

    /// Generate the next assistant message for an ordered history.
    fn complete(
        &self,
        _messages: &[Message],
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send {
        async { Err(ProviderError::Unsupported("complete".to_string())) }
    }

    /// Synthesize speech, returning raw audio bytes.
    fn speech(
        &self,
        _text: &str,
        _language: Language,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, ProviderError>> + Send {
        async { Err(ProviderError::Unsupported("speech".to_string())) }
    }

    /// Ask the backend for an SSML rendition of `text`.
    ///
    /// The raw response is returned unvalidated; callers extract and check
    /// the `<speak>` block.
    fn ssml(
        &self,
        _text: &str,
        _language: Language,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send {
        async { Err(ProviderError::Unsupported("ssml".to_string())) }
    }

    /// Whether the configured API key is accepted upstream.
    fn check_key(&self) -> impl std::future::Future<Output = Result<bool, ProviderError>> + Send {
        async { Err(ProviderError::Unsupported("status".to_string())) }
    }

    /// Current state of the upstream API as published by the provider.
    fn service_status(
        &self,
    ) -> impl std::future::Future<Output = Result<UpstreamStatus, ProviderError>> + Send {
        async { Err(ProviderError::Unsupported("status".to_string())) }
    }
}
