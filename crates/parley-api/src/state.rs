//! Application state wiring the orchestrator and status reporter.
//!
//! The orchestrator is generic over repository and hasher traits; AppState
//! pins it to the SQLite and Argon2 implementations.

use std::sync::Arc;

use parley_core::orchestrator::TurnOrchestrator;
use parley_core::status::StatusReporter;
use parley_core::voice::ProviderGateway;
use parley_infra::crypto::secret::Argon2SecretHasher;
use parley_infra::sqlite::conversation::SqliteConversationRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_infra::voice::build_gateway;
use parley_types::config::AppConfig;

pub type ConcreteOrchestrator = TurnOrchestrator<SqliteConversationRepository, Argon2SecretHasher>;

/// Shared state for REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub status: Arc<StatusReporter>,
}

impl AppState {
    /// Open the database, wire providers and build the orchestrator.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::open(&config.database).await?;
        tracing::info!(path = %config.database.path, "database opened");

        let gateway = provider_gateway(config)?;

        let orchestrator = TurnOrchestrator::new(
            Arc::new(SqliteConversationRepository::new(db_pool)),
            Arc::new(Argon2SecretHasher::new()),
            gateway.clone(),
            config.orchestrator.clone(),
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            status: Arc::new(StatusReporter::new(gateway)),
        })
    }
}

/// Build the provider gateway from configuration.
pub fn provider_gateway(config: &AppConfig) -> anyhow::Result<Arc<ProviderGateway>> {
    Ok(Arc::new(build_gateway(&config.openai, &config.elevenlabs)?))
}
