//! Pass-through status of the primary provider.

use std::sync::Arc;

use parley_types::error::GatewayError;
use parley_types::voice::StatusReport;

use crate::voice::ProviderGateway;

pub struct StatusReporter {
    gateway: Arc<ProviderGateway>,
}

impl StatusReporter {
    pub fn new(gateway: Arc<ProviderGateway>) -> Self {
        Self { gateway }
    }

    /// Check the API key and upstream status of the primary provider.
    ///
    /// `backend` is always true: reaching this code means the server is up.
    pub async fn report(&self) -> Result<StatusReport, GatewayError> {
        let key = self.gateway.check_key_validity().await?;
        let status = self.gateway.check_service_status().await?;

        tracing::debug!(key, %status, "provider status checked");

        Ok(StatusReport {
            backend: true,
            key,
            api: status.is_operational(),
            api_status: status.to_string(),
        })
    }
}
