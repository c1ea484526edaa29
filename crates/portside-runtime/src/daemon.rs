//! The long-running daemon: initial forward, periodic refresh and the live
//! event loop under one cancellation token.

use std::sync::Arc;
use std::time::Duration;

use ps_01_label_extractor::LabelExtractor;
use ps_02_providers::{ConfigProvider, EventProvider, WorkloadInspector, WorkloadProvider};
use ps_03_gateway_client::{ConnectionFactory, GatewayApi, GatewayClient};
use ps_04_orchestrator::{Orchestrator, OrchestratorApi};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::RuntimeConfig;
use crate::render::render_mappings;

/// Wired daemon, ready to [`run`](Self::run).
pub struct Daemon {
    config: RuntimeConfig,
    orchestrator: Arc<Orchestrator>,
}

impl Daemon {
    /// Resolve the gateway and register providers.
    ///
    /// A gateway that cannot be resolved is logged and the daemon runs
    /// without one; forwards then become no-ops. Workload and event
    /// providers are only registered when `inspector` is given.
    pub async fn build(
        config: RuntimeConfig,
        inspector: Option<Arc<dyn WorkloadInspector>>,
        factories: &[Arc<dyn ConnectionFactory>],
    ) -> Self {
        let gateway: Option<Arc<dyn GatewayApi>> =
            match GatewayClient::resolve(&config.gateway_config(), factories).await {
                Ok(client) => {
                    info!(local_ip = %client.local_ip(), "[runtime] Gateway client initialized");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    warn!(error = %e, "[runtime] Failed to initialize gateway client, continuing without one");
                    None
                }
            };

        let mut orchestrator = Orchestrator::new(config.orchestrator_config())
            .with_provider(Arc::new(ConfigProvider::new(config.ports.clone())))
            .with_gateway(gateway);

        match inspector {
            Some(inspector) => {
                orchestrator = orchestrator.with_provider(Arc::new(WorkloadProvider::new(
                    Arc::clone(&inspector),
                    LabelExtractor::new(config.label_config()),
                )));
                if config.watch_events {
                    orchestrator = orchestrator.with_event_provider(Arc::new(EventProvider::new(
                        inspector,
                        LabelExtractor::new(config.label_config()),
                    )));
                }
            }
            None => info!("[runtime] No workload inspector, using configured ports only"),
        }

        Self::from_parts(config, Arc::new(orchestrator))
    }

    /// Wrap an already-built orchestrator.
    pub fn from_parts(config: RuntimeConfig, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    /// The orchestrator driven by this daemon.
    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    /// Run until `cancel` fires.
    ///
    /// The first fetch and forward happen before this returns control to
    /// the refresh timer, so the first refresh is one full interval later.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            refresh_secs = self.config.refresh_interval().as_secs(),
            watch_events = self.config.watch_events,
            cleanup_on_stop = self.config.cleanup_on_stop,
            gateway = self.orchestrator.has_gateway(),
            "[runtime] Starting daemon"
        );

        refresh_once(self.orchestrator.as_ref(), false).await;

        let refresh = tokio::spawn(refresh_loop(
            Arc::clone(&self.orchestrator),
            self.config.refresh_interval(),
            cancel.child_token(),
        ));

        let events = if self.config.watch_events {
            let orchestrator = Arc::clone(&self.orchestrator);
            let token = cancel.child_token();
            let cleanup = self.config.cleanup_on_stop;
            Some(tokio::spawn(async move {
                orchestrator.run_event_loop(token, cleanup).await;
            }))
        } else {
            None
        };

        cancel.cancelled().await;
        info!("[runtime] Shutdown signal received");

        if let Err(e) = refresh.await {
            error!(error = %e, "[runtime] Refresh task failed");
        }
        if let Some(events) = events {
            if let Err(e) = events.await {
                error!(error = %e, "[runtime] Event loop task failed");
            }
        }
        info!("[runtime] Daemon stopped");
    }
}

async fn refresh_loop(
    orchestrator: Arc<Orchestrator>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => refresh_once(orchestrator.as_ref(), true).await,
        }
    }
    debug!("[runtime] Refresh loop stopped");
}

/// Fetch every provider and forward the result.
///
/// Errors are logged, never returned: the next refresh tries again. A
/// periodic refresh that finds nothing skips the gateway call.
async fn refresh_once(orchestrator: &dyn OrchestratorApi, periodic: bool) {
    let mappings = match orchestrator.fetch_all().await {
        Ok(mappings) => mappings,
        Err(e) => {
            error!(error = %e, "[runtime] Failed to fetch port mappings");
            return;
        }
    };

    if mappings.is_empty() {
        if periodic {
            debug!("[runtime] Refresh found no port mappings");
        } else {
            info!("[runtime] No port mappings to forward");
        }
        return;
    }

    info!("[runtime] {}", render_mappings(&mappings));
    match orchestrator.forward_all(&mappings).await {
        Ok(()) => info!(count = mappings.len(), "[runtime] Forwarded port mappings"),
        Err(e) => error!(error = %e, "[runtime] Failed to forward port mappings"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_01_label_extractor::PortBinding;
    use ps_02_providers::{LifecycleEvent, MockWorkloadInspector, Workload};
    use ps_03_gateway_client::{
        GatewayClientConfig, Generation, MockConnectionFactory, RecordingConnection,
    };
    use ps_04_orchestrator::OrchestratorConfig;
    use shared_types::{PortMapping, PortMappingEntry, Protocol};
    use std::net::Ipv4Addr;

    fn web_entry() -> PortMappingEntry {
        PortMappingEntry {
            external_port: 8080,
            internal_port: 80,
            protocol: "tcp".to_string(),
            name: "web".to_string(),
        }
    }

    fn daemon_with(conn: &RecordingConnection, config: RuntimeConfig) -> Daemon {
        let gateway: Arc<dyn GatewayApi> = Arc::new(GatewayClient::with_connection(
            Arc::new(conn.clone()),
            Ipv4Addr::new(192, 168, 1, 50),
            &GatewayClientConfig::default(),
        ));
        let orchestrator = Orchestrator::new(OrchestratorConfig::for_testing())
            .with_provider(Arc::new(ConfigProvider::new(config.ports.clone())))
            .with_gateway(Some(gateway));
        Daemon::from_parts(config, Arc::new(orchestrator))
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_forward_then_periodic_refresh() {
        let conn = RecordingConnection::new();
        let config = RuntimeConfig {
            refresh_interval_secs: 60,
            ports: Some(vec![web_entry()]),
            ..RuntimeConfig::default()
        };
        let daemon = Arc::new(daemon_with(&conn, config));
        let cancel = CancellationToken::new();

        let handle = {
            let daemon = Arc::clone(&daemon);
            let cancel = cancel.clone();
            tokio::spawn(async move { daemon.run(cancel).await })
        };

        tokio::time::sleep(Duration::from_secs(150)).await;
        cancel.cancel();
        handle.await.unwrap();

        // t=0, t=60, t=120
        let added = conn.added();
        assert_eq!(added.len(), 3);
        assert!(added.iter().all(|r| r.description == "Portside: web"));

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(conn.added().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_refresh_skips_gateway() {
        let conn = RecordingConnection::new();
        let config = RuntimeConfig {
            refresh_interval_secs: 10,
            ..RuntimeConfig::default()
        };
        let daemon = Arc::new(daemon_with(&conn, config));
        let cancel = CancellationToken::new();
        let handle = {
            let daemon = Arc::clone(&daemon);
            let cancel = cancel.clone();
            tokio::spawn(async move { daemon.run(cancel).await })
        };

        tokio::time::sleep(Duration::from_secs(35)).await;
        cancel.cancel();
        handle.await.unwrap();
        assert!(conn.added().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_once_logs_invalid_entry_and_skips_forward() {
        let conn = RecordingConnection::new();
        let config = RuntimeConfig {
            ports: Some(vec![PortMappingEntry {
                external_port: 0,
                ..web_entry()
            }]),
            ..RuntimeConfig::default()
        };
        let daemon = daemon_with(&conn, config);
        refresh_once(daemon.orchestrator().as_ref(), false).await;
        assert!(conn.added().is_empty());
    }

    #[tokio::test]
    async fn test_build_without_gateway_still_registers_providers() {
        let factory: Arc<dyn ConnectionFactory> =
            Arc::new(MockConnectionFactory::new(Generation::Igd2, None));
        let config = RuntimeConfig {
            ports: Some(vec![web_entry()]),
            ..RuntimeConfig::default()
        };
        let daemon = Daemon::build(config, None, &[factory]).await;
        assert!(!daemon.orchestrator().has_gateway());

        let mappings = daemon.orchestrator().fetch_all().await.unwrap();
        assert_eq!(
            mappings,
            vec![PortMapping::new(8080, 80, Protocol::Tcp).unwrap().with_name("web")]
        );
    }

    #[tokio::test]
    async fn test_build_registers_event_provider_only_when_watching() {
        let inspector: Arc<dyn WorkloadInspector> = Arc::new(MockWorkloadInspector::new());
        let config = RuntimeConfig {
            dry_run: true,
            ..RuntimeConfig::default()
        };
        let daemon = Daemon::build(config.clone(), Some(Arc::clone(&inspector)), &[]).await;
        assert!(daemon.orchestrator().has_gateway());
        assert_eq!(daemon.orchestrator().event_provider_count(), 0);

        let watching = RuntimeConfig {
            watch_events: true,
            ..config
        };
        let daemon = Daemon::build(watching, Some(inspector), &[]).await;
        assert_eq!(daemon.orchestrator().event_provider_count(), 1);
    }

    #[tokio::test]
    async fn test_run_forwards_running_workloads_and_events() {
        let inspector = MockWorkloadInspector::new();
        inspector.add_workload(
            Workload::new("aaaaaaaaaaaa", Some("/web"))
                .with_label("portside.forward", "published")
                .with_port(PortBinding::new(80, 8080, "tcp")),
        );
        inspector.add_workload(
            Workload::new("bbbbbbbbbbbb", Some("/db"))
                .with_label("portside.forward", "published")
                .with_port(PortBinding::new(5432, 15432, "tcp")),
        );
        inspector.stop_workload("bbbbbbbbbbbb");

        let conn = RecordingConnection::new();
        let gateway: Arc<dyn GatewayApi> = Arc::new(GatewayClient::with_connection(
            Arc::new(conn.clone()),
            Ipv4Addr::new(192, 168, 1, 50),
            &GatewayClientConfig::default(),
        ));
        let config = RuntimeConfig {
            watch_events: true,
            ..RuntimeConfig::default()
        };
        let shared: Arc<dyn WorkloadInspector> = Arc::new(inspector.clone());
        let orchestrator = Orchestrator::new(OrchestratorConfig::for_testing())
            .with_provider(Arc::new(WorkloadProvider::new(
                Arc::clone(&shared),
                LabelExtractor::new(config.label_config()),
            )))
            .with_event_provider(Arc::new(EventProvider::new(
                shared,
                LabelExtractor::new(config.label_config()),
            )))
            .with_gateway(Some(gateway));
        let daemon = Arc::new(Daemon::from_parts(config, Arc::new(orchestrator)));

        let cancel = CancellationToken::new();
        let handle = {
            let daemon = Arc::clone(&daemon);
            let cancel = cancel.clone();
            tokio::spawn(async move { daemon.run(cancel).await })
        };

        inspector.emit(LifecycleEvent::new("start", "bbbbbbbbbbbb"));
        let deadline = Instant::now() + Duration::from_secs(5);
        while conn.added().len() < 2 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cancel.cancel();
        handle.await.unwrap();

        let ports: Vec<u16> = conn.added().iter().map(|r| r.external_port).collect();
        assert_eq!(ports, vec![8080, 15432]);
    }
}
