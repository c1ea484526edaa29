//! # Domain Entities
//!
//! Requests sent to the gateway and entries read back from it.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use shared_types::Protocol;

use super::invariants::WILDCARD_REMOTE_HOST;

/// Gateway protocol generation. Later generations are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Generation {
    /// Internet Gateway Device v1.
    Igd1,
    /// Internet Gateway Device v2.
    Igd2,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generation::Igd1 => f.write_str("IGDv1"),
            Generation::Igd2 => f.write_str("IGDv2"),
        }
    }
}

/// One add-mapping call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMappingRequest {
    /// Remote host filter; always the wildcard.
    pub remote_host: String,
    /// Port opened on the gateway.
    pub external_port: u16,
    /// Transport protocol.
    pub protocol: Protocol,
    /// Port on the internal client.
    pub internal_port: u16,
    /// Internal client receiving the traffic.
    pub internal_client: Ipv4Addr,
    /// Whether the mapping is active.
    pub enabled: bool,
    /// Free-text description.
    pub description: String,
    /// Lease in seconds; 0 is permanent.
    pub lease_seconds: u32,
}

impl AddMappingRequest {
    /// Enabled request for the wildcard remote host.
    pub fn new(
        external_port: u16,
        protocol: Protocol,
        internal_port: u16,
        internal_client: Ipv4Addr,
        description: impl Into<String>,
        lease_seconds: u32,
    ) -> Self {
        Self {
            remote_host: WILDCARD_REMOTE_HOST.to_string(),
            external_port,
            protocol,
            internal_port,
            internal_client,
            enabled: true,
            description: description.into(),
            lease_seconds,
        }
    }
}

/// A mapping as reported by the gateway. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayMappingEntry {
    /// Port opened on the gateway.
    pub external_port: u16,
    /// Port on the internal client.
    pub internal_port: u16,
    /// Protocol exactly as the gateway reports it.
    pub protocol: String,
    /// Internal client address.
    pub internal_ip: String,
    /// Description.
    pub description: String,
    /// Lease in seconds; 0 is permanent.
    pub lease_seconds: u32,
    /// Whether the mapping is active.
    pub enabled: bool,
}

impl GatewayMappingEntry {
    /// Whether the lease never expires.
    pub fn is_permanent(&self) -> bool {
        self.lease_seconds == 0
    }

    /// `Permanent` or `<n> seconds`.
    pub fn lease_display(&self) -> String {
        if self.is_permanent() {
            "Permanent".to_string()
        } else {
            format!("{} seconds", self.lease_seconds)
        }
    }
}
