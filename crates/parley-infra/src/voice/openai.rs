//! OpenAiVoiceProvider -- the primary [`VoiceProvider`] backed by OpenAI.
//!
//! Chat completions (interview turns and SSML rewriting) go through
//! [`async_openai`]; the audio endpoints (`/audio/transcriptions`,
//! `/audio/speech`), the key check (`/models`) and the public status page are
//! called directly with reqwest.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use parley_core::prompt::InterviewPromptBuilder;
use parley_core::voice::VoiceProvider;
use parley_types::chat::TurnRole;
use parley_types::config::OpenAiConfig;
use parley_types::error::ProviderError;
use parley_types::language::Language;
use parley_types::voice::{AudioUpload, Message, ProviderCapabilities, UpstreamStatus};

use super::http::{ensure_success, http_client, join_url, request_failed};

/// OpenAI voice provider: transcription, completion, speech, SSML, status.
pub struct OpenAiVoiceProvider {
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    chat_model: String,
    transcription_model: String,
    speech_model: String,
    speech_voice: String,
    status_url: String,
    capabilities: ProviderCapabilities,
}

// OpenAiVoiceProvider intentionally does NOT derive Debug: the async-openai
// client holds the API key.

impl OpenAiVoiceProvider {
    pub fn new(config: &OpenAiConfig, api_key: SecretString) -> Result<Self, ProviderError> {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(&config.base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            http: http_client()?,
            api_key,
            base_url: config.base_url.clone(),
            chat_model: config.chat_model.clone(),
            transcription_model: config.transcription_model.clone(),
            speech_model: config.speech_model.clone(),
            speech_voice: config.speech_voice.clone(),
            status_url: config.status_url.clone(),
            capabilities: ProviderCapabilities {
                transcribe: true,
                complete: true,
                speech: !config.speech_languages.is_empty(),
                ssml: true,
                status: true,
                speech_languages: config.speech_languages.clone(),
            },
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn chat(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String, ProviderError> {
        let request = CreateChatCompletionRequest {
            model: self.chat_model.clone(),
            messages,
            ..Default::default()
        };

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResult)
    }
}

/// Convert role-tagged history into chat completion messages.
fn to_openai_messages(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
    messages
        .iter()
        .map(|msg| match msg.role {
            TurnRole::System => system_message(&msg.content),
            TurnRole::User => user_message(&msg.content),
            TurnRole::Assistant => {
                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    )),
                    refusal: None,
                    name: None,
                    audio: None,
                    tool_calls: None,
                    function_call: None,
                })
            }
        })
        .collect()
}

fn system_message(content: &str) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
        content: ChatCompletionRequestSystemMessageContent::Text(content.to_string()),
        name: None,
    })
}

fn user_message(content: &str) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
        content: ChatCompletionRequestUserMessageContent::Text(content.to_string()),
        name: None,
    })
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Statuspage `components.json` payload (only the fields we read).
#[derive(Debug, Deserialize)]
struct ComponentsPage {
    #[serde(default)]
    components: Vec<Component>,
}

#[derive(Debug, Deserialize)]
struct Component {
    name: String,
    status: String,
}

/// Pick the component named "API" (or the first one) and map its status.
fn api_component_status(page: &ComponentsPage) -> UpstreamStatus {
    page.components
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case("api"))
        .or_else(|| page.components.first())
        .and_then(|c| c.status.parse().ok())
        .unwrap_or(UpstreamStatus::Unknown)
}

impl VoiceProvider for OpenAiVoiceProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn transcribe(&self, audio: &AudioUpload, language: Language) -> Result<String, ProviderError> {
        let mut part = reqwest::multipart::Part::bytes(audio.bytes.clone())
            .file_name(audio.filename.clone());
        if let Some(content_type) = &audio.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ProviderError::InvalidRequest(format!("bad content type: {e}")))?;
        }

        let form = reqwest::multipart::Form::new()
            .text("model", self.transcription_model.clone())
            .text("language", language.code())
            .part("file", part);

        let response = self
            .http
            .post(self.url("/audio/transcriptions"))
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(request_failed)?;

        let transcript: TranscriptionResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(format!("failed to parse transcript: {e}")))?;

        Ok(transcript.text)
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        self.chat(to_openai_messages(messages)).await
    }

    async fn speech(&self, text: &str, _language: Language) -> Result<Vec<u8>, ProviderError> {
        let body = SpeechRequest {
            model: &self.speech_model,
            voice: &self.speech_voice,
            input: text,
        };

        let response = self
            .http
            .post(self.url("/audio/speech"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let bytes = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(request_failed)?;

        Ok(bytes.to_vec())
    }

    async fn ssml(&self, text: &str, language: Language) -> Result<String, ProviderError> {
        let instruction = InterviewPromptBuilder::ssml_instruction(language);
        self.chat(vec![system_message(&instruction), user_message(text)])
            .await
    }

    async fn check_key(&self) -> Result<bool, ProviderError> {
        let response = self
            .http
            .get(self.url("/models"))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(request_failed)?;

        match response.status().as_u16() {
            401 | 403 => Ok(false),
            _ => ensure_success(response).await.map(|_| true),
        }
    }

    async fn service_status(&self) -> Result<UpstreamStatus, ProviderError> {
        let response = self
            .http
            .get(&self.status_url)
            .send()
            .await
            .map_err(request_failed)?;

        let page: ComponentsPage = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(format!("failed to parse status page: {e}")))?;

        Ok(api_component_status(&page))
    }
}

/// Map an `async_openai::error::OpenAIError` to a [`ProviderError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> ProviderError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
            {
                ProviderError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                ProviderError::RateLimited
            } else {
                ProviderError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => ProviderError::AuthenticationFailed,
            Some(429) => ProviderError::RateLimited,
            _ => ProviderError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            ProviderError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => ProviderError::InvalidRequest(msg.clone()),
        _ => ProviderError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(config: &OpenAiConfig) -> OpenAiVoiceProvider {
        OpenAiVoiceProvider::new(config, SecretString::from("sk-test".to_string())).unwrap()
    }

    #[test]
    fn test_capabilities_follow_config() {
        let p = provider(&OpenAiConfig::default());
        assert_eq!(p.name(), "openai");
        let caps = p.capabilities();
        assert!(caps.transcribe && caps.complete && caps.ssml && caps.status);
        assert!(caps.speaks(Language::English));
        assert!(!caps.speaks(Language::Indonesian));
    }

    #[test]
    fn test_no_speech_languages_disables_speech() {
        let config = OpenAiConfig {
            speech_languages: Vec::new(),
            ..Default::default()
        };
        let p = provider(&config);
        assert!(!p.capabilities().speech);
        assert!(!p.capabilities().speaks(Language::English));
    }

    #[test]
    fn test_url_building() {
        let config = OpenAiConfig {
            base_url: "http://localhost:9000/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            provider(&config).url("/audio/speech"),
            "http://localhost:9000/v1/audio/speech"
        );
    }

    #[test]
    fn test_messages_keep_roles_and_order() {
        let messages = vec![
            Message {
                role: TurnRole::System,
                content: "sys".into(),
            },
            Message {
                role: TurnRole::Assistant,
                content: "hello".into(),
            },
            Message::user("answer"),
        ];
        let converted = to_openai_messages(&messages);
        assert_eq!(converted.len(), 3);
        assert!(matches!(converted[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(converted[1], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(converted[2], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_speech_request_shape() {
        let body = SpeechRequest {
            model: "tts-1",
            voice: "nova",
            input: "Hello",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "model": "tts-1", "voice": "nova", "input": "Hello" })
        );
    }

    #[test]
    fn test_status_prefers_api_component() {
        let page: ComponentsPage = serde_json::from_str(
            r#"{"components":[
                {"name":"ChatGPT","status":"major_outage"},
                {"name":"API","status":"degraded_performance"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(api_component_status(&page), UpstreamStatus::DegradedPerformance);
    }

    #[test]
    fn test_status_falls_back_to_first_component() {
        let page: ComponentsPage = serde_json::from_str(
            r#"{"components":[{"name":"Platform","status":"operational"}]}"#,
        )
        .unwrap();
        assert_eq!(api_component_status(&page), UpstreamStatus::Operational);
    }

    #[test]
    fn test_status_unknown_when_missing_or_unrecognized() {
        let empty: ComponentsPage = serde_json::from_str("{}").unwrap();
        assert_eq!(api_component_status(&empty), UpstreamStatus::Unknown);

        let odd: ComponentsPage = serde_json::from_str(
            r#"{"components":[{"name":"API","status":"under_maintenance"}]}"#,
        )
        .unwrap();
        assert_eq!(api_component_status(&odd), UpstreamStatus::Unknown);
    }
}
