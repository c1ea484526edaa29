//! # Domain Entities
//!
//! The extractor's view of a workload. A [`ContainerInfo`] lives for one
//! extraction call and is never stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::invariants::short_id;

/// A port declared by a workload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortBinding {
    /// Port inside the workload.
    pub private_port: u16,
    /// Host port it is published on; `0` when not published.
    pub public_port: u16,
    /// Transport type as reported by the runtime (`tcp`, `udp`, ...).
    pub transport: String,
}

impl PortBinding {
    /// Create a binding.
    pub fn new(private_port: u16, public_port: u16, transport: impl Into<String>) -> Self {
        Self {
            private_port,
            public_port,
            transport: transport.into(),
        }
    }

    /// Whether the binding is reachable through a host port.
    pub fn is_published(&self) -> bool {
        self.public_port != 0
    }
}

/// Label directive dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Directives name host-side mappings (`8080:80/tcp`).
    HostReferenced,
    /// Directives name container ports, resolved through published bindings.
    ContainerReferenced,
}

/// Everything the extractor needs to know about one workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    /// Opaque workload identifier.
    pub id: String,
    /// Human-readable name applied to every emitted mapping.
    pub display_name: String,
    /// Workload labels.
    pub labels: HashMap<String, String>,
    /// Declared port bindings.
    pub ports: Vec<PortBinding>,
}

impl ContainerInfo {
    /// Build the info for a workload.
    ///
    /// The display name is the declared name with any leading `/` removed,
    /// or the short identifier when the workload has no name.
    pub fn new(
        id: impl Into<String>,
        name: Option<&str>,
        labels: HashMap<String, String>,
        ports: Vec<PortBinding>,
    ) -> Self {
        let id = id.into();
        let display_name = match name.map(|n| n.trim_start_matches('/')) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => short_id(&id).to_string(),
        };
        Self {
            id,
            display_name,
            labels,
            ports,
        }
    }

    /// Short form of the identifier, for logs.
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }

    /// Value of a label, if present.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// First published binding for a container port.
    pub fn published_binding(&self, private_port: u16) -> Option<&PortBinding> {
        self.ports
            .iter()
            .find(|p| p.private_port == private_port && p.is_published())
    }
}
