//! # Outbound Ports
//!
//! The low-level gateway connection and the factories producing it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::Protocol;
use url::Url;

use crate::domain::{AddMappingRequest, GatewayFault, GatewayMappingEntry, Generation};

/// Wire-level gateway calls.
#[async_trait]
pub trait GatewayConnection: Send + Sync {
    /// Create or refresh a mapping.
    async fn add_mapping(&self, request: &AddMappingRequest) -> Result<(), GatewayFault>;

    /// Remove a mapping.
    async fn delete_mapping(
        &self,
        remote_host: &str,
        external_port: u16,
        protocol: Protocol,
    ) -> Result<(), GatewayFault>;

    /// External address of the gateway.
    async fn external_ip(&self) -> Result<String, GatewayFault>;

    /// Entry at `index`. Past the last entry the gateway answers with
    /// [`GatewayFault::array_index_invalid`].
    async fn entry_at_index(&self, index: u16) -> Result<GatewayMappingEntry, GatewayFault>;
}

/// Produces connections for one protocol generation.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    /// Generation served by this factory.
    fn generation(&self) -> Generation;

    /// Search the local network. `None` when no gateway answered.
    async fn discover(&self) -> Option<Arc<dyn GatewayConnection>>;

    /// Connect to the device described at `location`.
    async fn connect(&self, location: &Url) -> Result<Arc<dyn GatewayConnection>, GatewayFault>;
}

#[derive(Default)]
struct RecordingState {
    added: Vec<AddMappingRequest>,
    deleted: Vec<(u16, Protocol)>,
    entries: Vec<GatewayMappingEntry>,
    add_faults: HashMap<u16, GatewayFault>,
    entry_faults: HashMap<u16, GatewayFault>,
    delete_fault: Option<GatewayFault>,
}

/// In-memory connection for testing.
///
/// Records every call, serves a scripted mapping table followed by the
/// end-of-list fault, and fails selected calls on request.
#[derive(Clone, Default)]
pub struct RecordingConnection {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingConnection {
    /// Create an empty connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `entries` from enumeration.
    pub fn with_entries(self, entries: Vec<GatewayMappingEntry>) -> Self {
        self.state.lock().entries = entries;
        self
    }

    /// Fail adds for `external_port`.
    pub fn fail_add(&self, external_port: u16, fault: GatewayFault) {
        self.state.lock().add_faults.insert(external_port, fault);
    }

    /// Fail enumeration at `index`.
    pub fn fail_entry(&self, index: u16, fault: GatewayFault) {
        self.state.lock().entry_faults.insert(index, fault);
    }

    /// Fail every delete.
    pub fn fail_delete(&self, fault: GatewayFault) {
        self.state.lock().delete_fault = Some(fault);
    }

    /// Add requests received, including refused ones.
    pub fn added(&self) -> Vec<AddMappingRequest> {
        self.state.lock().added.clone()
    }

    /// Delete requests received.
    pub fn deleted(&self) -> Vec<(u16, Protocol)> {
        self.state.lock().deleted.clone()
    }
}

#[async_trait]
impl GatewayConnection for RecordingConnection {
    async fn add_mapping(&self, request: &AddMappingRequest) -> Result<(), GatewayFault> {
        let mut state = self.state.lock();
        state.added.push(request.clone());
        match state.add_faults.get(&request.external_port) {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    async fn delete_mapping(
        &self,
        _remote_host: &str,
        external_port: u16,
        protocol: Protocol,
    ) -> Result<(), GatewayFault> {
        let mut state = self.state.lock();
        state.deleted.push((external_port, protocol));
        match &state.delete_fault {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }

    async fn external_ip(&self) -> Result<String, GatewayFault> {
        Ok("198.51.100.7".to_string())
    }

    async fn entry_at_index(&self, index: u16) -> Result<GatewayMappingEntry, GatewayFault> {
        let state = self.state.lock();
        if let Some(fault) = state.entry_faults.get(&index) {
            return Err(fault.clone());
        }
        state
            .entries
            .get(usize::from(index))
            .cloned()
            .ok_or_else(GatewayFault::array_index_invalid)
    }
}

/// Factory for testing resolution order and timeouts.
pub struct MockConnectionFactory {
    generation: Generation,
    connection: Option<Arc<dyn GatewayConnection>>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl MockConnectionFactory {
    /// Factory that finds `connection` (or nothing) immediately.
    pub fn new(generation: Generation, connection: Option<Arc<dyn GatewayConnection>>) -> Self {
        Self {
            generation,
            connection,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Wait `delay` before answering discovery.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Calls received, as `discover` or `connect <url>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ConnectionFactory for MockConnectionFactory {
    fn generation(&self) -> Generation {
        self.generation
    }

    async fn discover(&self) -> Option<Arc<dyn GatewayConnection>> {
        self.calls.lock().push("discover".to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.connection.clone()
    }

    async fn connect(&self, location: &Url) -> Result<Arc<dyn GatewayConnection>, GatewayFault> {
        self.calls.lock().push(format!("connect {}", location));
        self.connection
            .clone()
            .ok_or_else(|| GatewayFault::Transport(format!("no {} service", self.generation)))
    }
}
