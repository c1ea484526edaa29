//! # Event Flows
//!
//! Lifecycle events from a mock workload runtime through the event
//! provider and the orchestrator's event loop to the gateway connection.

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use std::time::Duration;

    use ps_01_label_extractor::{LabelConfig, LabelExtractor, PortBinding};
    use ps_02_providers::{EventProvider, LifecycleEvent, MockWorkloadInspector, Workload};
    use ps_03_gateway_client::{GatewayApi, GatewayClient, GatewayClientConfig, RecordingConnection};
    use ps_04_orchestrator::{Orchestrator, OrchestratorApi, OrchestratorConfig};
    use shared_types::Protocol;
    use tokio::time::timeout;
    use tokio_util::sync::CancellationToken;

    const APP_ID: &str = "0123456789abcdef0123";

    fn app() -> Workload {
        Workload::new(APP_ID, Some("/app"))
            .with_label("portside.forward", "8080:80/tcp")
            .with_label("portside.forward.container", "53/udp")
            .with_port(PortBinding::new(53, 5353, "udp"))
    }

    fn event_orchestrator(
        inspector: &MockWorkloadInspector,
        conn: &RecordingConnection,
    ) -> Orchestrator {
        let gateway: Arc<dyn GatewayApi> = Arc::new(GatewayClient::with_connection(
            Arc::new(conn.clone()),
            Ipv4Addr::new(10, 0, 0, 2),
            &GatewayClientConfig::for_testing(),
        ));
        Orchestrator::new(OrchestratorConfig::for_testing())
            .with_event_provider(Arc::new(EventProvider::new(
                Arc::new(inspector.clone()),
                LabelExtractor::new(LabelConfig::default()),
            )))
            .with_gateway(Some(gateway))
    }

    #[tokio::test]
    async fn test_start_and_stop_with_cleanup() {
        let inspector = MockWorkloadInspector::new();
        let conn = RecordingConnection::new();
        inspector.add_workload(app());
        inspector.emit(LifecycleEvent::new("start", APP_ID));
        inspector.emit(LifecycleEvent::new("pause", APP_ID));
        inspector.emit(LifecycleEvent::new("stop", APP_ID));
        inspector.close_stream();

        let orchestrator = event_orchestrator(&inspector, &conn);
        timeout(
            Duration::from_secs(5),
            orchestrator.run_event_loop(CancellationToken::new(), true),
        )
        .await
        .expect("event loop should end with the stream");

        let mut added: Vec<(u16, u16, Protocol)> = conn
            .added()
            .iter()
            .map(|r| (r.external_port, r.internal_port, r.protocol))
            .collect();
        added.sort();
        assert_eq!(added, vec![(5353, 53, Protocol::Udp), (8080, 80, Protocol::Tcp)]);
        assert!(conn.added().iter().all(|r| r.description == "Portside: app"));
        assert!(conn.added().iter().all(|r| r.lease_seconds == 120));

        let mut deleted = conn.deleted();
        deleted.sort();
        assert_eq!(deleted, vec![(5353, Protocol::Udp), (8080, Protocol::Tcp)]);
    }

    #[tokio::test]
    async fn test_stop_without_cleanup_leaves_mappings() {
        let inspector = MockWorkloadInspector::new();
        let conn = RecordingConnection::new();
        inspector.add_workload(app());
        inspector.emit(LifecycleEvent::new("start", APP_ID));
        inspector.emit(LifecycleEvent::new("die", APP_ID));
        inspector.close_stream();

        let orchestrator = event_orchestrator(&inspector, &conn);
        timeout(
            Duration::from_secs(5),
            orchestrator.run_event_loop(CancellationToken::new(), false),
        )
        .await
        .expect("event loop should end with the stream");

        assert_eq!(conn.added().len(), 2);
        assert!(conn.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_ends_an_idle_event_loop() {
        let inspector = MockWorkloadInspector::new();
        let conn = RecordingConnection::new();
        let orchestrator = Arc::new(event_orchestrator(&inspector, &conn));
        let cancel = CancellationToken::new();

        let handle = {
            let orchestrator = Arc::clone(&orchestrator);
            let cancel = cancel.clone();
            tokio::spawn(async move { orchestrator.run_event_loop(cancel, true).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        assert!(timeout(Duration::from_secs(5), handle).await.is_ok());
        assert!(conn.added().is_empty());
    }
}
