//! Application configuration types for Parley.
//!
//! `AppConfig` mirrors the optional `parley.toml` file. Every field has a
//! default so an empty file (or no file at all) yields a runnable server once
//! the OpenAI API key is supplied through the environment.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::language::Language;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub openai: OpenAiConfig,
    pub elevenlabs: ElevenLabsConfig,
    pub orchestrator: OrchestratorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: String,
    /// Connections in the read-only pool. Writes always use one connection.
    pub max_readers: u32,
    /// How long a connection waits on a locked database.
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./app.db".to_string(),
            max_readers: 8,
            busy_timeout_secs: 5,
        }
    }
}

/// Cross-origin settings. `"*"` in a list means any value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string()],
            allowed_headers: vec![
                "Accept".to_string(),
                "Authorization".to_string(),
                "Content-Type".to_string(),
            ],
        }
    }
}

/// Settings for the primary provider.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub transcription_model: String,
    pub speech_model: String,
    pub speech_voice: String,
    /// Languages the speech endpoint is trusted to pronounce.
    pub speech_languages: Vec<Language>,
    pub status_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o".to_string(),
            transcription_model: "whisper-1".to_string(),
            speech_model: "tts-1".to_string(),
            speech_voice: "nova".to_string(),
            speech_languages: vec![Language::English],
            status_url: "https://status.openai.com/api/v2/components.json".to_string(),
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("transcription_model", &self.transcription_model)
            .field("speech_model", &self.speech_model)
            .field("speech_voice", &self.speech_voice)
            .field("speech_languages", &self.speech_languages)
            .field("status_url", &self.status_url)
            .finish()
    }
}

/// Settings for the optional secondary speech provider.
///
/// The provider is only wired when `api_key` is set.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevenLabsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_id: String,
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            voice_id: "cgSgspJ2msm6clMCkdW9".to_string(),
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

impl fmt::Debug for ElevenLabsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevenLabsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("voice_id", &self.voice_id)
            .field("stability", &self.stability)
            .field("similarity_boost", &self.similarity_boost)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Refuse answer/end calls once the closing turn has been appended.
    pub reject_after_end: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            reject_after_end: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit newline-delimited JSON instead of human-readable lines.
    pub json: bool,
    /// Bridge spans to OpenTelemetry (stdout exporter).
    pub otel: bool,
}
