//! TurnOrchestrator: the start / answer / end pipelines of a mock interview.
//!
//! Each operation runs one sequential pipeline:
//! authenticate -> load history -> transcribe -> complete -> synthesize ->
//! atomic append -> respond. Nothing is persisted unless every stage before
//! the append succeeds, and the append itself is all-or-nothing.
//!
//! The conversation phase is never stored; it is inferred from the history
//! on every call (see [`ConversationPhase::infer`]).

use std::sync::Arc;

use uuid::Uuid;

use parley_types::chat::{ConversationPhase, NewChatUser, NewTurn, Turn};
use parley_types::config::OrchestratorConfig;
use parley_types::error::{GatewayError, ProviderError, TurnError};
use parley_types::interview::{
    AnswerOutcome, EndOutcome, PromptText, SpokenText, StartInterview, StartOutcome,
};
use parley_types::language::Language;
use parley_types::voice::{AudioUpload, Message, SpeechOutput};

use crate::auth::{AuthenticatedUser, Credentials, SecretAuthGate, SecretHasher};
use crate::prompt::InterviewPromptBuilder;
use crate::repository::conversation::ConversationRepository;
use crate::voice::ProviderGateway;

pub struct TurnOrchestrator<R: ConversationRepository, H: SecretHasher> {
    repo: Arc<R>,
    hasher: Arc<H>,
    gate: SecretAuthGate<R, H>,
    gateway: Arc<ProviderGateway>,
    config: OrchestratorConfig,
}

impl<R: ConversationRepository, H: SecretHasher> TurnOrchestrator<R, H> {
    pub fn new(
        repo: Arc<R>,
        hasher: Arc<H>,
        gateway: Arc<ProviderGateway>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            gate: SecretAuthGate::new(repo.clone(), hasher.clone()),
            repo,
            hasher,
            gateway,
            config,
        }
    }

    /// Start a new interview: create the chat user, store the system prompt
    /// and spoken greeting, and hand back the one-time secret.
    pub async fn start(&self, request: StartInterview) -> Result<StartOutcome, TurnError> {
        let role = request.role.trim();
        if role.is_empty() {
            return Err(TurnError::BadRequest("role is required".to_string()));
        }

        let language = Language::from_request(request.language.as_deref());
        let skills: Vec<String> = request
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let system_prompt = InterviewPromptBuilder::system_prompt(role, &skills, language);
        let greeting = InterviewPromptBuilder::greeting(role, language);

        let speech = self
            .gateway
            .synthesize(&greeting, language)
            .await
            .inspect_err(|e| tracing::warn!(stage = "synthesize", error = %e, "start failed"))
            .map_err(stage_error)?;

        let secret = self.hasher.generate_secret();
        let secret_hash = self.hasher.hash_secret(&secret).await?;

        let (audio, ssml) = speech.clone().into_parts();
        let turns = [
            NewTurn::system(system_prompt),
            NewTurn::assistant(greeting.clone(), audio, ssml),
        ];
        let (user, _) = self
            .repo
            .start_conversation(&NewChatUser { secret_hash, language }, &turns)
            .await
            .inspect_err(|e| tracing::error!(stage = "persist", error = %e, "start failed"))?;

        tracing::info!(chat_user_id = %user.id, %language, skills = skills.len(), "interview started");

        Ok(StartOutcome {
            id: user.id,
            secret,
            language,
            chat: SpokenText::new(greeting, speech),
        })
    }

    /// Answer the current question with a recorded audio upload.
    pub async fn answer(
        &self,
        credentials: &Credentials,
        upload: Option<AudioUpload>,
    ) -> Result<AnswerOutcome, TurnError> {
        let auth = self.authenticate(credentials).await?;
        let id = auth.id();
        let history = self.load_history(&auth).await?;

        let upload = upload
            .filter(|u| !u.bytes.is_empty())
            .ok_or_else(|| TurnError::BadRequest("an audio file is required".to_string()))?;

        let language = auth.language();
        let transcript = self
            .gateway
            .transcribe(&upload, language)
            .await
            .inspect_err(|e| tracing::warn!(chat_user_id = %id, stage = "transcribe", error = %e, "answer failed"))
            .map_err(stage_error)?;

        let mut messages: Vec<Message> = history.iter().map(Message::from).collect();
        messages.push(Message::user(transcript.clone()));

        let reply = self.complete(id, &messages, "answer").await?;
        let speech = self.synthesize(id, &reply, language, "answer").await?;

        let (audio, ssml) = speech.clone().into_parts();
        let turns = [
            NewTurn::user(transcript.clone()),
            NewTurn::assistant(reply.clone(), audio, ssml),
        ];
        self.repo
            .append_turns(&id, &turns)
            .await
            .inspect_err(|e| tracing::error!(chat_user_id = %id, stage = "persist", error = %e, "answer failed"))?;

        tracing::info!(chat_user_id = %id, turns = history.len() + turns.len(), "answer recorded");

        Ok(AnswerOutcome {
            language,
            prompt: PromptText { text: transcript },
            answer: SpokenText::new(reply, speech),
        })
    }

    /// End the interview and return the interviewer's closing feedback.
    ///
    /// The closing instruction is sent to the completion backend but never
    /// stored; only the feedback is appended.
    pub async fn end(&self, credentials: &Credentials) -> Result<EndOutcome, TurnError> {
        let auth = self.authenticate(credentials).await?;
        let id = auth.id();
        let history = self.load_history(&auth).await?;
        let language = auth.language();

        let mut messages: Vec<Message> = history.iter().map(Message::from).collect();
        messages.push(Message::user(InterviewPromptBuilder::closing_instruction(
            language,
        )));

        let feedback = self.complete(id, &messages, "end").await?;
        let speech = self.synthesize(id, &feedback, language, "end").await?;

        let (audio, ssml) = speech.clone().into_parts();
        self.repo
            .append_turns(&id, &[NewTurn::assistant(feedback.clone(), audio, ssml)])
            .await
            .inspect_err(|e| tracing::error!(chat_user_id = %id, stage = "persist", error = %e, "end failed"))?;

        tracing::info!(chat_user_id = %id, turns = history.len() + 1, "interview ended");

        Ok(EndOutcome {
            language,
            answer: SpokenText::new(feedback, speech),
        })
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthenticatedUser, TurnError> {
        self.gate.authenticate(credentials).await.map_err(|e| {
            tracing::warn!(identity = credentials.identity(), error = %e, "authentication failed");
            TurnError::Auth(e)
        })
    }

    async fn load_history(&self, auth: &AuthenticatedUser) -> Result<Vec<Turn>, TurnError> {
        let turns = self
            .repo
            .get_turns(&auth.id())
            .await
            .inspect_err(|e| tracing::error!(chat_user_id = %auth.id(), stage = "load", error = %e, "history unavailable"))?;

        if self.config.reject_after_end && ConversationPhase::infer(&turns) == ConversationPhase::Ended {
            tracing::info!(chat_user_id = %auth.id(), "rejecting call on ended interview");
            return Err(TurnError::ConversationEnded);
        }
        Ok(turns)
    }

    async fn complete(
        &self,
        id: Uuid,
        messages: &[Message],
        op: &'static str,
    ) -> Result<String, TurnError> {
        self.gateway
            .complete(messages)
            .await
            .inspect_err(|e| tracing::warn!(chat_user_id = %id, stage = "complete", error = %e, "{op} failed"))
            .map_err(stage_error)
    }

    async fn synthesize(
        &self,
        id: Uuid,
        text: &str,
        language: Language,
        op: &'static str,
    ) -> Result<SpeechOutput, TurnError> {
        self.gateway
            .synthesize(text, language)
            .await
            .inspect_err(|e| tracing::warn!(chat_user_id = %id, stage = "synthesize", error = %e, "{op} failed"))
            .map_err(stage_error)
    }
}

/// Empty provider results get their own error kinds; everything else is an
/// upstream failure.
fn stage_error(err: GatewayError) -> TurnError {
    match err {
        GatewayError::TranscriptionFailed(ProviderError::EmptyResult) => TurnError::EmptyTranscript,
        GatewayError::CompletionFailed(ProviderError::EmptyResult) => TurnError::EmptyCompletion,
        other => TurnError::Upstream(other),
    }
}
