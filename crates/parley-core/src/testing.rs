//! In-memory test doubles for the core ports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use parley_types::chat::{ChatUser, NewChatUser, NewTurn, Turn};
use parley_types::error::{AuthError, ProviderError, RepositoryError};
use parley_types::language::Language;
use parley_types::voice::{AudioUpload, Message, ProviderCapabilities, UpstreamStatus};

use crate::auth::SecretHasher;
use crate::repository::conversation::ConversationRepository;
use crate::voice::VoiceProvider;

/// Vec-backed repository with switchable failures.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    users: Mutex<Vec<ChatUser>>,
    turns: Mutex<Vec<Turn>>,
    fail_reads: AtomicBool,
    fail_appends: AtomicBool,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn turns_of(&self, chat_user_id: Uuid) -> Vec<Turn> {
        self.turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.chat_user_id == chat_user_id)
            .cloned()
            .collect()
    }

    fn insert_user(&self, user: &NewChatUser) -> ChatUser {
        let user = ChatUser {
            id: Uuid::now_v7(),
            secret_hash: user.secret_hash.clone(),
            language: user.language,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    fn insert_turns(&self, chat_user_id: Uuid, turns: &[NewTurn]) -> Vec<Turn> {
        let created: Vec<Turn> = turns
            .iter()
            .map(|t| Turn {
                id: Uuid::now_v7(),
                chat_user_id,
                role: t.role,
                text: t.text.clone(),
                audio: t.audio.clone(),
                ssml: t.ssml.clone(),
                created_at: Utc::now(),
            })
            .collect();
        self.turns.lock().unwrap().extend(created.iter().cloned());
        created
    }

    fn check_append(&self) -> Result<(), RepositoryError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("forced append failure".to_string()));
        }
        Ok(())
    }
}

impl ConversationRepository for InMemoryConversationRepository {
    async fn create_user(&self, user: &NewChatUser) -> Result<ChatUser, RepositoryError> {
        Ok(self.insert_user(user))
    }

    async fn start_conversation(
        &self,
        user: &NewChatUser,
        turns: &[NewTurn],
    ) -> Result<(ChatUser, Vec<Turn>), RepositoryError> {
        self.check_append()?;
        let user = self.insert_user(user);
        let turns = self.insert_turns(user.id, turns);
        Ok((user, turns))
    }

    async fn append_turns(
        &self,
        chat_user_id: &Uuid,
        turns: &[NewTurn],
    ) -> Result<Vec<Turn>, RepositoryError> {
        self.check_append()?;
        if !self.users.lock().unwrap().iter().any(|u| u.id == *chat_user_id) {
            return Err(RepositoryError::Query("FOREIGN KEY constraint failed".to_string()));
        }
        Ok(self.insert_turns(*chat_user_id, turns))
    }

    async fn get_user(&self, chat_user_id: &Uuid) -> Result<ChatUser, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == *chat_user_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_turns(&self, chat_user_id: &Uuid) -> Result<Vec<Turn>, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        Ok(self.turns_of(*chat_user_id))
    }
}

/// Reversible "hash" so tests can run without a real KDF.
pub struct PlainHasher;

impl SecretHasher for PlainHasher {
    fn generate_secret(&self) -> String {
        "generated-secret".to_string()
    }

    async fn hash_secret(&self, secret: &str) -> Result<String, AuthError> {
        Ok(format!("plain${secret}"))
    }

    async fn verify_secret(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain${secret}"))
    }
}

/// Provider whose every answer is fixed up front. `None` means the call fails.
#[derive(Clone)]
pub struct ScriptedProvider {
    pub name: &'static str,
    pub capabilities: ProviderCapabilities,
    pub transcript: Option<String>,
    pub completion: Option<String>,
    pub speech: Option<Vec<u8>>,
    pub ssml: Option<String>,
    pub key_valid: Option<bool>,
    pub status: Option<UpstreamStatus>,
    /// Text handed to `speech`, in call order.
    pub spoken: Arc<Mutex<Vec<String>>>,
    /// Message lists handed to `complete`, in call order.
    pub completions: Arc<Mutex<Vec<Vec<Message>>>>,
}

pub const SCRIPTED_COMPLETION: &str = "Great. How would you speed up a slow SQL query?";

impl ScriptedProvider {
    /// Primary-style provider: every capability, English speech only.
    pub fn full() -> Self {
        Self {
            name: "scripted",
            capabilities: ProviderCapabilities {
                transcribe: true,
                complete: true,
                speech: true,
                ssml: true,
                status: true,
                speech_languages: vec![Language::English],
            },
            transcript: Some("I have five years of Go experience.".to_string()),
            completion: Some(SCRIPTED_COMPLETION.to_string()),
            speech: Some(b"RIFF-primary".to_vec()),
            ssml: Some(format!("<speak>{SCRIPTED_COMPLETION}</speak>")),
            key_valid: Some(true),
            status: Some(UpstreamStatus::Operational),
            spoken: Arc::default(),
            completions: Arc::default(),
        }
    }

    /// Secondary-style provider: speech in every language, nothing else.
    pub fn speech_only() -> Self {
        Self {
            name: "scripted-speech",
            capabilities: ProviderCapabilities {
                speech: true,
                ..Default::default()
            },
            transcript: None,
            completion: None,
            speech: Some(b"RIFF-secondary".to_vec()),
            ssml: None,
            key_valid: None,
            status: None,
            spoken: Arc::default(),
            completions: Arc::default(),
        }
    }

    pub fn upload() -> AudioUpload {
        AudioUpload {
            bytes: b"webm-bytes".to_vec(),
            filename: "answer.webm".to_string(),
            content_type: Some("audio/webm".to_string()),
        }
    }

    fn scripted<T: Clone>(value: &Option<T>, op: &str) -> Result<T, ProviderError> {
        value.clone().ok_or_else(|| ProviderError::Provider {
            message: format!("scripted {op} failure"),
        })
    }
}

impl VoiceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn transcribe(
        &self,
        _audio: &AudioUpload,
        _language: Language,
    ) -> Result<String, ProviderError> {
        Self::scripted(&self.transcript, "transcribe")
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        self.completions.lock().unwrap().push(messages.to_vec());
        Self::scripted(&self.completion, "complete")
    }

    async fn speech(&self, text: &str, _language: Language) -> Result<Vec<u8>, ProviderError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Self::scripted(&self.speech, "speech")
    }

    async fn ssml(&self, _text: &str, _language: Language) -> Result<String, ProviderError> {
        Self::scripted(&self.ssml, "ssml")
    }

    async fn check_key(&self) -> Result<bool, ProviderError> {
        Self::scripted(&self.key_valid, "check_key")
    }

    async fn service_status(&self) -> Result<UpstreamStatus, ProviderError> {
        Self::scripted(&self.status, "service_status")
    }
}
