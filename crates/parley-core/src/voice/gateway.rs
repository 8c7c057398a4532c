//! ProviderGateway: capability-based dispatch over the configured providers.
//!
//! One primary provider handles transcription, completion and (when it
//! can) speech. An optional secondary provider is used only for speech in
//! languages the primary cannot voice. When neither can speak, the primary is
//! asked for SSML so the client can synthesize locally; if that also fails
//! the reply goes out as text only.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use parley_types::error::{GatewayError, ProviderError, SanitizeError};
use parley_types::language::Language;
use parley_types::voice::{AudioUpload, Message, SpeechOutput, UpstreamStatus};

use super::box_provider::BoxVoiceProvider;
use crate::sanitize::{extract_ssml, strip_markup, validate_semantic_identity};

pub struct ProviderGateway {
    primary: BoxVoiceProvider,
    secondary: Option<BoxVoiceProvider>,
}

impl ProviderGateway {
    /// Build a gateway from a primary and an optional secondary speech provider.
    ///
    /// The primary must declare transcription and completion; the secondary
    /// must declare speech.
    pub fn new(
        primary: BoxVoiceProvider,
        secondary: Option<BoxVoiceProvider>,
    ) -> Result<Self, GatewayError> {
        let caps = primary.capabilities();
        if !caps.transcribe || !caps.complete {
            return Err(GatewayError::Misconfigured(format!(
                "primary provider '{}' must support transcription and completion",
                primary.name()
            )));
        }
        if let Some(secondary) = &secondary {
            if !secondary.capabilities().speech {
                return Err(GatewayError::Misconfigured(format!(
                    "secondary provider '{}' does not support speech",
                    secondary.name()
                )));
            }
        }

        tracing::info!(
            primary = primary.name(),
            secondary = secondary.as_ref().map(|s| s.name()).unwrap_or("none"),
            "provider gateway ready"
        );

        Ok(Self { primary, secondary })
    }

    /// Transcribe an uploaded answer. Empty transcripts are failures.
    pub async fn transcribe(
        &self,
        audio: &AudioUpload,
        language: Language,
    ) -> Result<String, GatewayError> {
        let text = self
            .primary
            .transcribe(audio, language)
            .await
            .map_err(GatewayError::TranscriptionFailed)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(GatewayError::TranscriptionFailed(ProviderError::EmptyResult));
        }
        Ok(text.to_string())
    }

    /// Generate the next assistant message from the ordered history.
    pub async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError> {
        let text = self
            .primary
            .complete(messages)
            .await
            .map_err(GatewayError::CompletionFailed)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(GatewayError::CompletionFailed(ProviderError::EmptyResult));
        }
        Ok(text.to_string())
    }

    /// Produce a spoken rendition of `text`.
    ///
    /// Order: primary audio, secondary audio, primary SSML, text only.
    /// Upstream errors while producing audio fail the call; every problem on
    /// the SSML branch degrades to [`SpeechOutput::TextOnly`].
    pub async fn synthesize(
        &self,
        text: &str,
        language: Language,
    ) -> Result<SpeechOutput, GatewayError> {
        let input = strip_markup(text);

        if self.primary.capabilities().speaks(language) {
            return speak_with(&self.primary, &input, language).await;
        }

        if let Some(secondary) = &self.secondary {
            if secondary.capabilities().speaks(language) {
                return speak_with(secondary, &input, language).await;
            }
        }

        if self.primary.capabilities().ssml {
            return Ok(self.ssml_or_text(text, &input, language).await);
        }

        tracing::debug!(%language, "no speech or ssml capability, replying with text only");
        Ok(SpeechOutput::TextOnly)
    }

    async fn ssml_or_text(&self, original: &str, input: &str, language: Language) -> SpeechOutput {
        let raw = match self.primary.ssml(input, language).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    provider = self.primary.name(),
                    %language,
                    error = %e,
                    "ssml generation failed, replying with text only"
                );
                return SpeechOutput::TextOnly;
            }
        };

        let checked: Result<String, SanitizeError> = extract_ssml(&raw)
            .and_then(|ssml| validate_semantic_identity(original, &ssml).map(|()| ssml));

        match checked {
            Ok(ssml) => SpeechOutput::Ssml(ssml),
            Err(e) => {
                tracing::debug!(%language, error = %e, "discarding ssml");
                SpeechOutput::TextOnly
            }
        }
    }

    /// Whether the primary provider accepts its API key.
    pub async fn check_key_validity(&self) -> Result<bool, GatewayError> {
        if !self.primary.capabilities().status {
            return Err(GatewayError::StatusFailed(ProviderError::Unsupported(
                "status".to_string(),
            )));
        }
        self.primary
            .check_key()
            .await
            .map_err(GatewayError::StatusFailed)
    }

    /// Upstream state of the primary provider's API.
    pub async fn check_service_status(&self) -> Result<UpstreamStatus, GatewayError> {
        if !self.primary.capabilities().status {
            return Err(GatewayError::StatusFailed(ProviderError::Unsupported(
                "status".to_string(),
            )));
        }
        self.primary
            .service_status()
            .await
            .map_err(GatewayError::StatusFailed)
    }
}

impl std::fmt::Debug for ProviderGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderGateway")
            .field("primary", &self.primary.name())
            .field("secondary", &self.secondary.as_ref().map(|s| s.name()))
            .finish()
    }
}

async fn speak_with(
    provider: &BoxVoiceProvider,
    input: &str,
    language: Language,
) -> Result<SpeechOutput, GatewayError> {
    let audio = provider
        .speech(input, language)
        .await
        .map_err(GatewayError::SynthesisFailed)?;
    if audio.is_empty() {
        return Err(GatewayError::SynthesisFailed(ProviderError::EmptyResult));
    }

    tracing::debug!(provider = provider.name(), %language, bytes = audio.len(), "speech synthesized");
    Ok(SpeechOutput::Audio(STANDARD.encode(audio)))
}
