//! Runtime errors.

use portside_telemetry::TelemetryError;
use ps_03_gateway_client::GatewayError;
use ps_04_orchestrator::OrchestratorError;
use shared_types::MappingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by commands and daemon startup.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A mapping spec did not parse.
    #[error("failed to parse port mapping: {0}")]
    Mapping(#[from] MappingError),

    /// Gateway resolution or a gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Fetching or forwarding failed.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// The log subscriber could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}
