//! # Orchestrator Service
//!
//! Fetch-merge-forward on demand, plus the live event loop.

use std::sync::Arc;

use async_trait::async_trait;
use ps_02_providers::{EventPortProvider, PortEventChannels, PortProvider};
use ps_03_gateway_client::GatewayApi;
use shared_types::PortMapping;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{StreamExt, StreamMap};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::OrchestratorConfig;
use crate::domain::OrchestratorError;
use crate::ports::OrchestratorApi;

/// Owns the provider set and at most one gateway client.
pub struct Orchestrator {
    config: OrchestratorConfig,
    providers: Vec<Arc<dyn PortProvider>>,
    event_providers: Vec<Arc<dyn EventPortProvider>>,
    gateway: Option<Arc<dyn GatewayApi>>,
}

impl Orchestrator {
    /// Create an orchestrator with no providers and no gateway.
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config,
            providers: Vec::new(),
            event_providers: Vec::new(),
            gateway: None,
        }
    }

    /// Register a static provider. Providers are fetched in registration
    /// order.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn PortProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Register an event provider.
    #[must_use]
    pub fn with_event_provider(mut self, provider: Arc<dyn EventPortProvider>) -> Self {
        self.event_providers.push(provider);
        self
    }

    /// Set the gateway client.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Option<Arc<dyn GatewayApi>>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Whether a gateway client is configured.
    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    /// Number of registered event providers.
    pub fn event_provider_count(&self) -> usize {
        self.event_providers.len()
    }
}

async fn forward_one(gateway: Option<&Arc<dyn GatewayApi>>, mapping: PortMapping) {
    let Some(gateway) = gateway else {
        info!(mapping = %mapping, "[ps-04] No gateway, not forwarding");
        return;
    };
    match gateway.forward_ports(std::slice::from_ref(&mapping)).await {
        Ok(()) => debug!(mapping = %mapping, "[ps-04] Applied mapping"),
        Err(e) => error!(mapping = %mapping, error = %e, "[ps-04] Failed to apply mapping"),
    }
}

async fn drain_deletes(
    gateway: Arc<dyn GatewayApi>,
    mut deletes: StreamMap<usize, ReceiverStream<PortMapping>>,
    cancel: CancellationToken,
) {
    loop {
        let mapping = tokio::select! {
            _ = cancel.cancelled() => break,
            next = deletes.next() => match next {
                Some((_, mapping)) => mapping,
                None => break,
            },
        };
        match gateway
            .delete_port_mapping(mapping.external_port, mapping.protocol)
            .await
        {
            Ok(()) => info!(
                external_port = mapping.external_port,
                protocol = %mapping.protocol,
                name = %mapping.name,
                "[ps-04] Removed mapping of stopped workload"
            ),
            Err(e) => error!(
                external_port = mapping.external_port,
                protocol = %mapping.protocol,
                name = %mapping.name,
                error = %e,
                "[ps-04] Failed to remove mapping"
            ),
        }
    }
    debug!("[ps-04] Delete drain stopped");
}

#[async_trait]
impl OrchestratorApi for Orchestrator {
    async fn fetch_all(&self) -> Result<Vec<PortMapping>, OrchestratorError> {
        let mut all = Vec::new();
        for provider in &self.providers {
            let mappings = provider.get_port_mappings().await.map_err(|source| {
                OrchestratorError::Provider {
                    provider: provider.name(),
                    source,
                }
            })?;
            debug!(
                provider = provider.name(),
                count = mappings.len(),
                "[ps-04] Fetched mappings"
            );
            all.extend(mappings);
        }
        Ok(all)
    }

    async fn forward_all(&self, mappings: &[PortMapping]) -> Result<(), OrchestratorError> {
        match &self.gateway {
            None => {
                info!(
                    count = mappings.len(),
                    "[ps-04] No gateway configured, skipping forward"
                );
                Ok(())
            }
            Some(gateway) => {
                gateway.forward_ports(mappings).await?;
                info!(count = mappings.len(), "[ps-04] Forwarded mappings");
                Ok(())
            }
        }
    }

    async fn run_event_loop(&self, cancel: CancellationToken, cleanup_on_stop: bool) {
        let scope = cancel.child_token();
        let cleanup = cleanup_on_stop && self.gateway.is_some();
        if cleanup_on_stop && !cleanup {
            warn!("[ps-04] Cleanup requested without a gateway, ignoring stop events");
        }

        let capacity = self.config.effective_capacity();
        let mut adds = StreamMap::new();
        let mut deletes = StreamMap::new();
        let mut tasks = JoinSet::new();

        for (index, provider) in self.event_providers.iter().enumerate() {
            let (add_tx, add_rx) = mpsc::channel(capacity);
            adds.insert(index, ReceiverStream::new(add_rx));

            let channels = if cleanup {
                let (delete_tx, delete_rx) = mpsc::channel(capacity);
                deletes.insert(index, ReceiverStream::new(delete_rx));
                PortEventChannels::new(add_tx, delete_tx)
            } else {
                PortEventChannels::add_only(add_tx)
            };

            let provider = Arc::clone(provider);
            let token = scope.clone();
            tasks.spawn(async move {
                provider.listen(token, channels).await;
                debug!(provider = provider.name(), "[ps-04] Event provider stopped");
            });
        }

        if let (true, Some(gateway)) = (cleanup, &self.gateway) {
            tasks.spawn(drain_deletes(Arc::clone(gateway), deletes, scope.clone()));
        }

        info!(
            providers = self.event_providers.len(),
            cleanup,
            "[ps-04] Event loop started"
        );

        loop {
            tokio::select! {
                _ = scope.cancelled() => break,
                next = adds.next() => match next {
                    Some((_, mapping)) => forward_one(self.gateway.as_ref(), mapping).await,
                    None => {
                        info!("[ps-04] All event providers stopped");
                        break;
                    }
                },
            }
        }

        // After cancellation every task observes `scope`; otherwise the
        // providers are done and the delete drain ends with its channels.
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "[ps-04] Event loop task failed");
            }
        }
        info!("[ps-04] Event loop stopped");
    }
}
