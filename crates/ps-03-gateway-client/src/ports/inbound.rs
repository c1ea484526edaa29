//! # Inbound Ports
//!
//! What the gateway client offers to the orchestrator and the runtime.

use async_trait::async_trait;
use shared_types::{PortMapping, Protocol};

use crate::domain::{GatewayError, GatewayMappingEntry};

/// Gateway operations.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Issue one add call per mapping, in input order.
    ///
    /// Every mapping is attempted. On failure the error lists each mapping
    /// the gateway refused; the others are in place.
    async fn forward_ports(&self, mappings: &[PortMapping]) -> Result<(), GatewayError>;

    /// Remove the mapping for `external_port`/`protocol`.
    async fn delete_port_mapping(
        &self,
        external_port: u16,
        protocol: Protocol,
    ) -> Result<(), GatewayError>;

    /// Read the gateway's full mapping table.
    async fn list_port_mappings(&self) -> Result<Vec<GatewayMappingEntry>, GatewayError>;

    /// The gateway's external address.
    async fn external_ip(&self) -> Result<String, GatewayError>;
}
