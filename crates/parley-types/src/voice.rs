//! Voice provider request/response types.
//!
//! These types model the data shapes exchanged with AI providers:
//! completion messages, uploaded audio, declared capabilities, synthesized
//! speech, and upstream service status.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::chat::{Turn, TurnRole};
use crate::language::Language;

/// A single role/content message sent to a completion backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: TurnRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.text.clone(),
        }
    }
}

/// An audio file uploaded by the interviewee.
#[derive(Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

impl fmt::Debug for AudioUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioUpload")
            .field("bytes", &self.bytes.len())
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// What a provider supports.
///
/// The gateway dispatches on these flags, never on the concrete provider type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    pub transcribe: bool,
    pub complete: bool,
    pub speech: bool,
    pub ssml: bool,
    pub status: bool,
    /// Languages speech synthesis supports. Empty means every language.
    #[serde(default)]
    pub speech_languages: Vec<Language>,
}

impl ProviderCapabilities {
    /// Whether the provider can synthesize audio for `language`.
    pub fn speaks(&self, language: Language) -> bool {
        self.speech
            && (self.speech_languages.is_empty() || self.speech_languages.contains(&language))
    }
}

/// Result of the speech synthesis fallback policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutput {
    /// Base64-encoded audio.
    Audio(String),
    /// Sanitized `<speak>` block for client-side synthesis.
    Ssml(String),
    /// Neither audio nor SSML could be produced.
    TextOnly,
}

impl SpeechOutput {
    /// Split into the optional `(audio, ssml)` pair stored on a turn.
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        match self {
            SpeechOutput::Audio(audio) => (Some(audio), None),
            SpeechOutput::Ssml(ssml) => (None, Some(ssml)),
            SpeechOutput::TextOnly => (None, None),
        }
    }
}

/// Upstream component state as published by a provider's status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamStatus {
    Operational,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
    Unknown,
}

impl UpstreamStatus {
    /// Project onto a tri-state: operational, degraded, or unknown.
    pub fn is_operational(&self) -> Option<bool> {
        match self {
            UpstreamStatus::Operational => Some(true),
            UpstreamStatus::DegradedPerformance
            | UpstreamStatus::PartialOutage
            | UpstreamStatus::MajorOutage => Some(false),
            UpstreamStatus::Unknown => None,
        }
    }
}

impl fmt::Display for UpstreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamStatus::Operational => write!(f, "operational"),
            UpstreamStatus::DegradedPerformance => write!(f, "degraded_performance"),
            UpstreamStatus::PartialOutage => write!(f, "partial_outage"),
            UpstreamStatus::MajorOutage => write!(f, "major_outage"),
            UpstreamStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for UpstreamStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operational" => Ok(UpstreamStatus::Operational),
            "degraded_performance" => Ok(UpstreamStatus::DegradedPerformance),
            "partial_outage" => Ok(UpstreamStatus::PartialOutage),
            "major_outage" => Ok(UpstreamStatus::MajorOutage),
            "unknown" => Ok(UpstreamStatus::Unknown),
            other => Err(format!("invalid upstream status: '{other}'")),
        }
    }
}

/// Pass-through status report for the unauthenticated status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Always true while the server answers.
    pub backend: bool,
    /// Whether the primary provider accepts the configured API key.
    pub key: bool,
    /// `null` when the upstream state is unknown.
    pub api: Option<bool>,
    #[serde(rename = "apiStatus")]
    pub api_status: String,
}
