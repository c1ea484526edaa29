//! # Domain Errors

use ps_02_providers::ProviderError;
use ps_03_gateway_client::GatewayError;
use thiserror::Error;

/// Orchestrator errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// A static provider failed; nothing was aggregated.
    #[error("provider {provider} failed: {source}")]
    Provider {
        /// Provider name.
        provider: &'static str,
        /// Provider error.
        source: ProviderError,
    },

    /// Forwarding failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
