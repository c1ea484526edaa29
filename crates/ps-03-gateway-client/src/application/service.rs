//! # Gateway Client Service
//!
//! Resolves a gateway and exposes the mapping operations on top of one
//! connection held for the client's lifetime.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared_types::{PortMapping, Protocol};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::adapters::{detect_local_ipv4, EchoConnection};
use crate::config::GatewayClientConfig;
use crate::domain::{
    describe, lease_seconds, AddMappingRequest, ForwardFailure, GatewayError,
    GatewayMappingEntry, DRY_RUN_LOCAL_IP, WILDCARD_REMOTE_HOST,
};
use crate::ports::{ConnectionFactory, GatewayApi, GatewayConnection};

/// Gateway client.
pub struct GatewayClient {
    connection: Arc<dyn GatewayConnection>,
    local_ip: Ipv4Addr,
    lease: Duration,
    description_prefix: String,
}

impl GatewayClient {
    /// Build a client over an existing connection.
    pub fn with_connection(
        connection: Arc<dyn GatewayConnection>,
        local_ip: Ipv4Addr,
        config: &GatewayClientConfig,
    ) -> Self {
        Self {
            connection,
            local_ip,
            lease: config.lease_duration(),
            description_prefix: config.description_prefix.clone(),
        }
    }

    /// Build a dry-run client over `echo`.
    pub fn dry_run(echo: EchoConnection, config: &GatewayClientConfig) -> Self {
        let local_ip = config.local_ip.unwrap_or(DRY_RUN_LOCAL_IP);
        Self::with_connection(Arc::new(echo), local_ip, config)
    }

    /// Resolve a gateway as described by `config`.
    ///
    /// Factories are tried newest generation first, either at
    /// `config.gateway_url` or by discovery bounded by
    /// `config.discovery_timeout`. The local address is detected when not
    /// configured.
    pub async fn resolve(
        config: &GatewayClientConfig,
        factories: &[Arc<dyn ConnectionFactory>],
    ) -> Result<Self, GatewayError> {
        if config.dry_run {
            info!("[ps-03] Dry run: gateway calls are logged only");
            return Ok(Self::dry_run(EchoConnection::new(), config));
        }

        let mut ordered: Vec<&Arc<dyn ConnectionFactory>> = factories.iter().collect();
        ordered.sort_by(|a, b| b.generation().cmp(&a.generation()));

        let connection = match &config.gateway_url {
            Some(location) => connect_at(&ordered, location).await?,
            None => discover(&ordered, config.discovery_timeout()).await?,
        };

        let local_ip = match config.local_ip {
            Some(ip) => ip,
            None => detect_local_ipv4()?,
        };
        info!(local_ip = %local_ip, "[ps-03] Gateway client ready");

        Ok(Self::with_connection(connection, local_ip, config))
    }

    /// Internal client address sent with every add.
    pub fn local_ip(&self) -> Ipv4Addr {
        self.local_ip
    }

    fn add_request(&self, mapping: &PortMapping) -> AddMappingRequest {
        AddMappingRequest::new(
            mapping.external_port,
            mapping.protocol,
            mapping.internal_port,
            self.local_ip,
            describe(&self.description_prefix, &mapping.name),
            lease_seconds(self.lease),
        )
    }
}

async fn connect_at(
    factories: &[&Arc<dyn ConnectionFactory>],
    location: &Url,
) -> Result<Arc<dyn GatewayConnection>, GatewayError> {
    for factory in factories {
        match factory.connect(location).await {
            Ok(connection) => {
                info!(
                    generation = %factory.generation(),
                    url = %location,
                    "[ps-03] Connected to gateway"
                );
                return Ok(connection);
            }
            Err(e) => {
                debug!(
                    generation = %factory.generation(),
                    error = %e,
                    "[ps-03] Gateway service not available"
                );
            }
        }
    }
    Err(GatewayError::Discovery(format!(
        "no supported gateway service found at {}",
        location
    )))
}

async fn discover(
    factories: &[&Arc<dyn ConnectionFactory>],
    timeout: Duration,
) -> Result<Arc<dyn GatewayConnection>, GatewayError> {
    let search = async {
        for factory in factories {
            if let Some(connection) = factory.discover().await {
                info!(generation = %factory.generation(), "[ps-03] Discovered gateway");
                return Some(connection);
            }
            debug!(generation = %factory.generation(), "[ps-03] No gateway answered");
        }
        None
    };

    match tokio::time::timeout(timeout, search).await {
        Ok(Some(connection)) => Ok(connection),
        Ok(None) | Err(_) => Err(GatewayError::Discovery(format!(
            "no gateway found within {:?}",
            timeout
        ))),
    }
}

#[async_trait]
impl GatewayApi for GatewayClient {
    async fn forward_ports(&self, mappings: &[PortMapping]) -> Result<(), GatewayError> {
        let mut failures = Vec::new();

        for mapping in mappings {
            let request = self.add_request(mapping);
            match self.connection.add_mapping(&request).await {
                Ok(()) => {
                    info!(
                        external_port = mapping.external_port,
                        protocol = %mapping.protocol,
                        name = %mapping.name,
                        "[ps-03] Forwarded port"
                    );
                }
                Err(fault) => {
                    error!(
                        external_port = mapping.external_port,
                        protocol = %mapping.protocol,
                        name = %mapping.name,
                        error = %fault,
                        "[ps-03] Failed to forward port"
                    );
                    failures.push(ForwardFailure {
                        mapping: mapping.clone(),
                        fault,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::Forward { failures })
        }
    }

    async fn delete_port_mapping(
        &self,
        external_port: u16,
        protocol: Protocol,
    ) -> Result<(), GatewayError> {
        self.connection
            .delete_mapping(WILDCARD_REMOTE_HOST, external_port, protocol)
            .await
            .map_err(|fault| GatewayError::Call {
                operation: "delete port mapping",
                fault,
            })?;
        info!(external_port, protocol = %protocol, "[ps-03] Deleted port mapping");
        Ok(())
    }

    async fn list_port_mappings(&self) -> Result<Vec<GatewayMappingEntry>, GatewayError> {
        let mut entries = Vec::new();

        for index in 0..=u16::MAX {
            match self.connection.entry_at_index(index).await {
                Ok(entry) => entries.push(entry),
                Err(fault) if fault.is_array_index_invalid() => {
                    debug!(count = entries.len(), "[ps-03] End of mapping table");
                    return Ok(entries);
                }
                Err(fault) => return Err(GatewayError::Enumeration { index, fault }),
            }
        }

        warn!("[ps-03] Mapping table did not terminate; returning first 65536 entries");
        Ok(entries)
    }

    async fn external_ip(&self) -> Result<String, GatewayError> {
        self.connection
            .external_ip()
            .await
            .map_err(|fault| GatewayError::Call {
                operation: "get external IP",
                fault,
            })
    }
}
