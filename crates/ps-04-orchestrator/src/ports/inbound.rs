//! # Inbound Ports

use async_trait::async_trait;
use shared_types::PortMapping;
use tokio_util::sync::CancellationToken;

use crate::domain::OrchestratorError;

/// Orchestrator API.
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    /// Concatenated output of every static provider, in registration order.
    async fn fetch_all(&self) -> Result<Vec<PortMapping>, OrchestratorError>;

    /// Forward `mappings` to the gateway, if one is configured.
    async fn forward_all(&self, mappings: &[PortMapping]) -> Result<(), OrchestratorError>;

    /// Apply event provider output until `cancel` fires or every event
    /// provider has stopped.
    async fn run_event_loop(&self, cancel: CancellationToken, cleanup_on_stop: bool);
}
