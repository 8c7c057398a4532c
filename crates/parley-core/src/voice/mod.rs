//! Voice provider abstraction and capability-based dispatch.

pub mod box_provider;
pub mod gateway;
pub mod provider;

pub use box_provider::BoxVoiceProvider;
pub use gateway::ProviderGateway;
pub use provider::VoiceProvider;
