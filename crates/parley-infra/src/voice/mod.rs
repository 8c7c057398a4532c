//! Voice provider clients and gateway wiring.

pub mod elevenlabs;
pub mod http;
pub mod openai;

pub use elevenlabs::ElevenLabsVoiceProvider;
pub use openai::OpenAiVoiceProvider;

use secrecy::SecretString;

use parley_core::voice::{BoxVoiceProvider, ProviderGateway};
use parley_types::config::{ElevenLabsConfig, OpenAiConfig};
use parley_types::error::GatewayError;

/// Build the provider gateway from configuration.
///
/// OpenAI is the primary provider and its key is required. ElevenLabs is
/// wired as the secondary speech provider only when its key is set.
pub fn build_gateway(
    openai: &OpenAiConfig,
    elevenlabs: &ElevenLabsConfig,
) -> Result<ProviderGateway, GatewayError> {
    let openai_key = non_empty_key(openai.api_key.as_deref())
        .ok_or_else(|| GatewayError::Misconfigured("OpenAI API key is not set".to_string()))?;

    let primary = OpenAiVoiceProvider::new(openai, openai_key)
        .map_err(|e| GatewayError::Misconfigured(format!("OpenAI provider: {e}")))?;

    let secondary = match non_empty_key(elevenlabs.api_key.as_deref()) {
        Some(key) => Some(BoxVoiceProvider::new(
            ElevenLabsVoiceProvider::new(elevenlabs, key)
                .map_err(|e| GatewayError::Misconfigured(format!("ElevenLabs provider: {e}")))?,
        )),
        None => None,
    };

    ProviderGateway::new(BoxVoiceProvider::new(primary), secondary)
}

fn non_empty_key(key: Option<&str>) -> Option<SecretString> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| SecretString::from(k.to_string()))
}
