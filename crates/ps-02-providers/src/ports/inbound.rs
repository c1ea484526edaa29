//! # Inbound Ports
//!
//! The two provider contracts the orchestrator consumes.

use async_trait::async_trait;
use shared_types::PortMapping;
use tokio_util::sync::CancellationToken;

use crate::domain::{PortEventChannels, ProviderError};

/// Point-in-time source of mappings.
#[async_trait]
pub trait PortProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Every mapping the source currently wants published.
    ///
    /// All-or-nothing: an error means no mappings from this provider.
    async fn get_port_mappings(&self) -> Result<Vec<PortMapping>, ProviderError>;
}

/// Continuous source of mapping additions and removals.
#[async_trait]
pub trait EventPortProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Publish on `channels` until `cancel` fires or the underlying event
    /// source fails.
    async fn listen(&self, cancel: CancellationToken, channels: PortEventChannels);
}
