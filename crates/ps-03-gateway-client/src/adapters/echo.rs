//! Dry-run connection that logs requests instead of sending them.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::Protocol;
use tracing::info;

use crate::domain::{
    AddMappingRequest, GatewayFault, GatewayMappingEntry, DRY_RUN_LOCAL_IP, ECHO_EXTERNAL_IP,
};
use crate::ports::GatewayConnection;

#[derive(Default)]
struct EchoState {
    forwarded: Vec<AddMappingRequest>,
    deleted: Vec<(u16, Protocol)>,
    forward_fault: Option<GatewayFault>,
    delete_fault: Option<GatewayFault>,
}

/// Connection used in dry-run mode.
///
/// Logs every call. The mapping table holds a single sample entry.
#[derive(Clone, Default)]
pub struct EchoConnection {
    state: Arc<Mutex<EchoState>>,
}

impl EchoConnection {
    /// Create an echo connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every add with `fault`.
    pub fn set_forward_fault(&self, fault: Option<GatewayFault>) {
        self.state.lock().forward_fault = fault;
    }

    /// Refuse every delete with `fault`.
    pub fn set_delete_fault(&self, fault: Option<GatewayFault>) {
        self.state.lock().delete_fault = fault;
    }

    /// Accepted add requests.
    pub fn forwarded(&self) -> Vec<AddMappingRequest> {
        self.state.lock().forwarded.clone()
    }

    /// Accepted delete requests.
    pub fn deleted(&self) -> Vec<(u16, Protocol)> {
        self.state.lock().deleted.clone()
    }
}

#[async_trait]
impl GatewayConnection for EchoConnection {
    async fn add_mapping(&self, request: &AddMappingRequest) -> Result<(), GatewayFault> {
        info!(
            external_port = request.external_port,
            internal_port = request.internal_port,
            protocol = %request.protocol,
            internal_ip = %request.internal_client,
            description = %request.description,
            lease_seconds = request.lease_seconds,
            "[ps-03] [dry-run] Adding port mapping"
        );
        let mut state = self.state.lock();
        if let Some(fault) = &state.forward_fault {
            return Err(fault.clone());
        }
        state.forwarded.push(request.clone());
        Ok(())
    }

    async fn delete_mapping(
        &self,
        _remote_host: &str,
        external_port: u16,
        protocol: Protocol,
    ) -> Result<(), GatewayFault> {
        info!(
            external_port,
            protocol = %protocol,
            "[ps-03] [dry-run] Deleting port mapping"
        );
        let mut state = self.state.lock();
        if let Some(fault) = &state.delete_fault {
            return Err(fault.clone());
        }
        state.deleted.push((external_port, protocol));
        Ok(())
    }

    async fn external_ip(&self) -> Result<String, GatewayFault> {
        info!(ip = %ECHO_EXTERNAL_IP, "[ps-03] [dry-run] External IP requested");
        Ok(ECHO_EXTERNAL_IP.to_string())
    }

    async fn entry_at_index(&self, index: u16) -> Result<GatewayMappingEntry, GatewayFault> {
        info!(index, "[ps-03] [dry-run] Listing port mapping");
        if index == 0 {
            return Ok(GatewayMappingEntry {
                external_port: 8080,
                internal_port: 80,
                protocol: "TCP".to_string(),
                internal_ip: DRY_RUN_LOCAL_IP.to_string(),
                description: "Test Mapping".to_string(),
                lease_seconds: 3600,
                enabled: true,
            });
        }
        Err(GatewayFault::array_index_invalid())
    }
}
