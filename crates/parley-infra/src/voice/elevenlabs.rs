//! ElevenLabs text-to-speech, used as the secondary speech provider.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use parley_core::voice::VoiceProvider;
use parley_types::config::ElevenLabsConfig;
use parley_types::error::ProviderError;
use parley_types::language::Language;
use parley_types::voice::ProviderCapabilities;

use super::http::{ensure_success, http_client, join_url, request_failed};

pub struct ElevenLabsVoiceProvider {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model_id: String,
    voice_id: String,
    stability: f32,
    similarity_boost: f32,
    capabilities: ProviderCapabilities,
}

#[derive(Debug, Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsVoiceProvider {
    pub fn new(config: &ElevenLabsConfig, api_key: SecretString) -> Result<Self, ProviderError> {
        Ok(Self {
            http: http_client()?,
            api_key,
            base_url: config.base_url.clone(),
            model_id: config.model_id.clone(),
            voice_id: config.voice_id.clone(),
            stability: config.stability,
            similarity_boost: config.similarity_boost,
            // The multilingual model covers every interview language.
            capabilities: ProviderCapabilities {
                speech: true,
                ..Default::default()
            },
        })
    }

    fn speech_url(&self) -> String {
        join_url(&self.base_url, &format!("/text-to-speech/{}", self.voice_id))
    }

    fn request_body<'a>(&'a self, text: &'a str) -> TextToSpeechRequest<'a> {
        TextToSpeechRequest {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings {
                stability: self.stability,
                similarity_boost: self.similarity_boost,
            },
        }
    }
}

impl VoiceProvider for ElevenLabsVoiceProvider {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn speech(&self, text: &str, _language: Language) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .http
            .post(self.speech_url())
            .header("xi-api-key", self.api_key.expose_secret())
            .header("accept", "audio/mpeg")
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(request_failed)?;

        let bytes = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(request_failed)?;

        tracing::debug!(bytes = bytes.len(), "elevenlabs speech synthesized");
        Ok(bytes.to_vec())
    }
}
