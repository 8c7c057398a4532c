//! Chat user and turn types for Parley.
//!
//! A conversation is the ordered list of turns owned by one chat user.
//! Turns are append-only; the only ordering guarantee is insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::language::Language;

/// Role of a turn in the interview conversation.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('system', 'user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::System => write!(f, "system"),
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(TurnRole::System),
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// The interviewee behind one conversation.
///
/// `secret_hash` is a salted one-way hash (PHC string); the plaintext secret
/// is handed to the client once at session start and never stored.
#[derive(Clone, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: Uuid,
    pub secret_hash: String,
    pub language: Language,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for ChatUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatUser")
            .field("id", &self.id)
            .field("secret_hash", &"<redacted>")
            .field("language", &self.language)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fields needed to create a chat user; the store assigns id and timestamp.
#[derive(Clone)]
pub struct NewChatUser {
    pub secret_hash: String,
    pub language: Language,
}

/// One persisted utterance in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub chat_user_id: Uuid,
    pub role: TurnRole,
    pub text: String,
    /// Base64-encoded synthesized audio (assistant turns only).
    pub audio: Option<String>,
    /// SSML rendition used when no audio could be synthesized.
    pub ssml: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A turn that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTurn {
    pub role: TurnRole,
    pub text: String,
    pub audio: Option<String>,
    pub ssml: Option<String>,
}

impl NewTurn {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            text: text.into(),
            audio: None,
            ssml: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            audio: None,
            ssml: None,
        }
    }

    pub fn assistant(text: impl Into<String>, audio: Option<String>, ssml: Option<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            audio,
            ssml,
        }
    }
}

/// Where a conversation stands, derived from its history (never stored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationPhase {
    Answering,
    Ended,
}

impl ConversationPhase {
    /// Infer the phase from an ordered turn history.
    ///
    /// The closing feedback is the only assistant turn appended alone after
    /// the greeting, so two trailing assistant turns past the opening pair
    /// mean the interview was ended.
    pub fn infer(turns: &[Turn]) -> Self {
        match turns {
            [.., a, b] if turns.len() >= 3
                && a.role == TurnRole::Assistant
                && b.role == TurnRole::Assistant =>
            {
                ConversationPhase::Ended
            }
            _ => ConversationPhase::Answering,
        }
    }
}
