//! Inputs and outcomes of the interview operations (start, answer, end).
//!
//! Outcomes serialize directly into the HTTP response payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::language::Language;
use crate::voice::SpeechOutput;

/// Parameters for starting a new mock interview.
#[derive(Debug, Clone, Deserialize)]
pub struct StartInterview {
    /// Job role being interviewed for (e.g. "backend engineer").
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Requested language code; unrecognized codes fall back to English.
    #[serde(default)]
    pub language: Option<String>,
}

/// Text with its optional spoken rendition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssml: Option<String>,
}

impl SpokenText {
    pub fn new(text: impl Into<String>, speech: SpeechOutput) -> Self {
        let (audio, ssml) = speech.into_parts();
        Self {
            text: text.into(),
            audio,
            ssml,
        }
    }
}

/// Transcribed interviewee utterance echoed back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptText {
    pub text: String,
}

/// Result of starting an interview.
///
/// `secret` is the only time the plaintext secret leaves the server.
#[derive(Clone, Serialize)]
pub struct StartOutcome {
    pub id: Uuid,
    pub secret: String,
    pub language: Language,
    pub chat: SpokenText,
}

impl fmt::Debug for StartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartOutcome")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .field("language", &self.language)
            .field("chat", &self.chat)
            .finish()
    }
}

/// Result of answering one interview question.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub language: Language,
    pub prompt: PromptText,
    pub answer: SpokenText,
}

/// Result of ending the interview with closing feedback.
#[derive(Debug, Clone, Serialize)]
pub struct EndOutcome {
    pub language: Language,
    pub answer: SpokenText,
}
