//! BoxVoiceProvider -- object-safe dynamic dispatch wrapper for VoiceProvider.
//!
//! 1. Define an object-safe `VoiceProviderDyn` trait with boxed futures
//! 2. Blanket-impl `VoiceProviderDyn` for all `T: VoiceProvider`
//! 3. `BoxVoiceProvider` wraps `Box<dyn VoiceProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::error::ProviderError;
use parley_types::language::Language;
use parley_types::voice::{AudioUpload, Message, ProviderCapabilities, UpstreamStatus};

use super::provider::VoiceProvider;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Object-safe version of [`VoiceProvider`] with boxed futures.
pub trait VoiceProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &ProviderCapabilities;

    fn transcribe_boxed<'a>(
        &'a self,
        audio: &'a AudioUpload,
        language: Language,
    ) -> BoxFuture<'a, String>;

    fn complete_boxed<'a>(&'a self, messages: &'a [Message]) -> BoxFuture<'a, String>;

    fn speech_boxed<'a>(&'a self, text: &'a str, language: Language) -> BoxFuture<'a, Vec<u8>>;

    fn ssml_boxed<'a>(&'a self, text: &'a str, language: Language) -> BoxFuture<'a, String>;

    fn check_key_boxed(&self) -> BoxFuture<'_, bool>;

    fn service_status_boxed(&self) -> BoxFuture<'_, UpstreamStatus>;
}

/// Blanket implementation: any `VoiceProvider` automatically implements `VoiceProviderDyn`.
impl<T: VoiceProvider> VoiceProviderDyn for T {
    fn name(&self) -> &str {
        VoiceProvider::name(self)
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        VoiceProvider::capabilities(self)
    }

    fn transcribe_boxed<'a>(
        &'a self,
        audio: &'a AudioUpload,
        language: Language,
    ) -> BoxFuture<'a, String> {
        Box::pin(self.transcribe(audio, language))
    }

    fn complete_boxed<'a>(&'a self, messages: &'a [Message]) -> BoxFuture<'a, String> {
        Box::pin(self.complete(messages))
    }

    fn speech_boxed<'a>(&'a self, text: &'a str, language: Language) -> BoxFuture<'a, Vec<u8>> {
        Box::pin(self.speech(text, language))
    }

    fn ssml_boxed<'a>(&'a self, text: &'a str, language: Language) -> BoxFuture<'a, String> {
        Box::pin(self.ssml(text, language))
    }

    fn check_key_boxed(&self) -> BoxFuture<'_, bool> {
        Box::pin(self.check_key())
    }

    fn service_status_boxed(&self) -> BoxFuture<'_, UpstreamStatus> {
        Box::pin(self.service_status())
    }
}

/// Type-erased voice provider for runtime provider selection.
///
/// Since `VoiceProvider` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxVoiceProvider` provides equivalent methods that delegate to
/// the inner `VoiceProviderDyn` trait object.
pub struct BoxVoiceProvider {
    inner: Box<dyn VoiceProviderDyn + Send + Sync>,
}

impl BoxVoiceProvider {
    /// Wrap a concrete `VoiceProvider` in a type-erased box.
    pub fn new<T: VoiceProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn capabilities(&self) -> &ProviderCapabilities {
        self.inner.capabilities()
    }

    pub async fn transcribe(
        &self,
        audio: &AudioUpload,
        language: Language,
    ) -> Result<String, ProviderError> {
        self.inner.transcribe_boxed(audio, language).await
    }

    pub async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        self.inner.complete_boxed(messages).await
    }

    pub async fn speech(&self, text: &str, language: Language) -> Result<Vec<u8>, ProviderError> {
        self.inner.speech_boxed(text, language).await
    }

    pub async fn ssml(&self, text: &str, language: Language) -> Result<String, ProviderError> {
        self.inner.ssml_boxed(text, language).await
    }

    pub async fn check_key(&self) -> Result<bool, ProviderError> {
        self.inner.check_key_boxed().await
    }

    pub async fn service_status(&self) -> Result<UpstreamStatus, ProviderError> {
        self.inner.service_status_boxed().await
    }
}

impl std::fmt::Debug for BoxVoiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxVoiceProvider")
            .field("name", &self.name())
            .field("capabilities", self.capabilities())
            .finish()
    }
}
