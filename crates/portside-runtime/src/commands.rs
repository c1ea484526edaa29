//! One-shot commands.
//!
//! Each takes an already-resolved gateway or orchestrator; resolution
//! failures are the caller's to report.

use std::sync::Arc;

use ps_03_gateway_client::{ConnectionFactory, GatewayApi, GatewayClient, GatewayMappingEntry};
use ps_04_orchestrator::OrchestratorApi;
use shared_types::{parse_port_mapping, PortMapping};
use tracing::{error, info};

use crate::config::RuntimeConfig;
use crate::errors::RuntimeError;
use crate::render::{render_gateway_table, render_mappings};

/// The gateway's mapping table, as read and as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayListing {
    /// Entries in enumeration order.
    pub entries: Vec<GatewayMappingEntry>,
    /// Aligned table of `entries`.
    pub table: String,
}

/// Resolve the gateway for a command. Unlike the daemon, commands need one.
pub async fn connect(
    config: &RuntimeConfig,
    factories: &[Arc<dyn ConnectionFactory>],
) -> Result<GatewayClient, RuntimeError> {
    let client = GatewayClient::resolve(&config.gateway_config(), factories).await?;
    info!(local_ip = %client.local_ip(), "[runtime] Gateway client initialized");
    Ok(client)
}

/// Parse `spec`, name it, and forward it.
pub async fn add(
    gateway: &dyn GatewayApi,
    spec: &str,
    name: Option<&str>,
) -> Result<PortMapping, RuntimeError> {
    let parsed = parse_port_mapping(spec)?;
    let mapping = match name {
        Some(name) => parsed.with_name(name),
        None => parsed,
    };

    match gateway.forward_ports(std::slice::from_ref(&mapping)).await {
        Ok(()) => {
            info!(mapping = %mapping, "[runtime] Added port mapping");
            Ok(mapping)
        }
        Err(e) => {
            error!(mapping = %mapping, error = %e, "[runtime] Failed to add port mapping");
            Err(e.into())
        }
    }
}

/// Parse `spec` and delete by external port and protocol. Its internal
/// port is ignored.
pub async fn delete(gateway: &dyn GatewayApi, spec: &str) -> Result<PortMapping, RuntimeError> {
    let mapping = parse_port_mapping(spec)?;
    gateway
        .delete_port_mapping(mapping.external_port, mapping.protocol)
        .await?;
    info!(
        external_port = mapping.external_port,
        protocol = %mapping.protocol,
        "[runtime] Deleted port mapping"
    );
    Ok(mapping)
}

/// Read and render the gateway's mapping table.
pub async fn list(gateway: &dyn GatewayApi) -> Result<GatewayListing, RuntimeError> {
    let entries = gateway.list_port_mappings().await?;
    let table = render_gateway_table(&entries);
    info!(count = entries.len(), "[runtime] {}", table);
    Ok(GatewayListing { entries, table })
}

/// Fetch from every provider and forward the result once.
pub async fn forward_once(
    orchestrator: &dyn OrchestratorApi,
) -> Result<Vec<PortMapping>, RuntimeError> {
    let mappings = orchestrator.fetch_all().await?;
    info!("[runtime] {}", render_mappings(&mappings));
    orchestrator.forward_all(&mappings).await?;
    Ok(mappings)
}
