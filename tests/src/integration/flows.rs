//! # Integration Test Flows
//!
//! Static providers through the orchestrator to a recording gateway
//! connection:
//!
//! ```text
//! [ConfigProvider] ─┐
//!                   ├─→ [Orchestrator] ─→ [GatewayClient] ─→ [RecordingConnection]
//! [ConfigProvider] ─┘
//! ```

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::Arc;

    use portside_runtime::{commands, render_gateway_table, RuntimeError};
    use ps_02_providers::{ConfigProvider, ProviderError};
    use ps_03_gateway_client::{
        GatewayApi, GatewayClient, GatewayClientConfig, GatewayError, GatewayFault,
        GatewayMappingEntry, RecordingConnection,
    };
    use ps_04_orchestrator::{Orchestrator, OrchestratorApi, OrchestratorConfig, OrchestratorError};
    use shared_types::{MappingError, PortMappingEntry, Protocol};

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn entry(external_port: i64, internal_port: i64, name: &str) -> PortMappingEntry {
        PortMappingEntry {
            external_port,
            internal_port,
            protocol: "TCP".to_string(),
            name: name.to_string(),
        }
    }

    fn gateway(conn: &RecordingConnection) -> Arc<dyn GatewayApi> {
        Arc::new(GatewayClient::with_connection(
            Arc::new(conn.clone()),
            Ipv4Addr::new(192, 168, 1, 50),
            &GatewayClientConfig::default(),
        ))
    }

    fn two_provider_orchestrator(conn: &RecordingConnection) -> Orchestrator {
        Orchestrator::new(OrchestratorConfig::default())
            .with_provider(Arc::new(ConfigProvider::new(Some(vec![entry(
                8080, 80, "web",
            )]))))
            .with_provider(Arc::new(ConfigProvider::new(Some(vec![entry(
                5432, 5432, "db",
            )]))))
            .with_gateway(Some(gateway(conn)))
    }

    fn table_entry(external_port: u16) -> GatewayMappingEntry {
        GatewayMappingEntry {
            external_port,
            internal_port: external_port,
            protocol: "UDP".to_string(),
            internal_ip: "192.168.1.50".to_string(),
            description: format!("Portside: {external_port}"),
            lease_seconds: 0,
            enabled: true,
        }
    }

    // =========================================================================
    // FETCH AND FORWARD
    // =========================================================================

    #[tokio::test]
    async fn test_fetch_then_forward_reaches_gateway_once_per_mapping() -> anyhow::Result<()> {
        let conn = RecordingConnection::new();
        let orchestrator = two_provider_orchestrator(&conn);

        let mappings = orchestrator.fetch_all().await?;
        orchestrator.forward_all(&mappings).await?;

        let added = conn.added();
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].external_port, 8080);
        assert_eq!(added[0].internal_port, 80);
        assert_eq!(added[0].description, "Portside: web");
        assert_eq!(added[0].internal_client, Ipv4Addr::new(192, 168, 1, 50));
        assert_eq!(added[1].external_port, 5432);
        assert_eq!(added[1].description, "Portside: db");
        assert!(added.iter().all(|r| r.protocol == Protocol::Tcp && r.enabled));
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_forward_sends_identical_requests() -> anyhow::Result<()> {
        let conn = RecordingConnection::new();
        let orchestrator = two_provider_orchestrator(&conn);

        commands::forward_once(&orchestrator).await?;
        commands::forward_once(&orchestrator).await?;

        let added = conn.added();
        assert_eq!(added.len(), 4);
        assert_eq!(added[..2], added[2..]);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_entry_fails_fetch_before_any_gateway_call() {
        let conn = RecordingConnection::new();
        let orchestrator = Orchestrator::new(OrchestratorConfig::default())
            .with_provider(Arc::new(ConfigProvider::new(Some(vec![
                entry(8080, 80, "web"),
                entry(70000, 80, "bad"),
            ]))))
            .with_gateway(Some(gateway(&conn)));

        let err = commands::forward_once(&orchestrator).await.unwrap_err();
        match err {
            RuntimeError::Orchestrator(OrchestratorError::Provider {
                provider,
                source: ProviderError::InvalidEntry { index, source },
            }) => {
                assert_eq!(provider, "config");
                assert_eq!(index, 1);
                assert!(matches!(source, MappingError::Range { value: 70000, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(conn.added().is_empty());
    }

    #[tokio::test]
    async fn test_partial_forward_failure_still_sends_the_rest() {
        let conn = RecordingConnection::new();
        conn.fail_add(8080, GatewayFault::Upnp {
            code: 718,
            description: "ConflictInMappingEntry".to_string(),
        });
        let orchestrator = two_provider_orchestrator(&conn);

        let mappings = orchestrator.fetch_all().await.unwrap();
        let err = orchestrator.forward_all(&mappings).await.unwrap_err();

        assert_eq!(conn.added().len(), 2);
        match err {
            OrchestratorError::Gateway(GatewayError::Forward { failures }) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].mapping.external_port, 8080);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // =========================================================================
    // ONE-SHOT COMMANDS
    // =========================================================================

    #[tokio::test]
    async fn test_add_then_delete_by_external_port() -> anyhow::Result<()> {
        let conn = RecordingConnection::new();
        let client = gateway(&conn);

        commands::add(client.as_ref(), "9000:90/udp", Some("game")).await?;
        commands::delete(client.as_ref(), "9000:1/udp").await?;

        assert_eq!(conn.added()[0].description, "Portside: game");
        assert_eq!(conn.deleted(), vec![(9000, Protocol::Udp)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_stops_at_end_of_table() -> anyhow::Result<()> {
        let conn = RecordingConnection::new()
            .with_entries(vec![table_entry(1000), table_entry(1001), table_entry(1002)]);

        let listing = commands::list(gateway(&conn).as_ref()).await?;
        assert_eq!(listing.entries.len(), 3);
        assert_eq!(listing.table, render_gateway_table(&listing.entries));
        assert_eq!(listing.table.lines().count(), 1 + 2 + 3);
        assert!(listing.table.contains("Permanent"));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_surfaces_fault_before_end_of_table() {
        let conn = RecordingConnection::new()
            .with_entries(vec![table_entry(1000), table_entry(1001), table_entry(1002)]);
        conn.fail_entry(2, GatewayFault::Transport("connection reset".to_string()));

        let err = commands::list(gateway(&conn).as_ref()).await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Gateway(GatewayError::Enumeration { index: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_no_gateway_forward_is_a_no_op() -> anyhow::Result<()> {
        let orchestrator = Orchestrator::new(OrchestratorConfig::default())
            .with_provider(Arc::new(ConfigProvider::new(Some(vec![entry(
                8080, 80, "web",
            )]))));

        let mappings = commands::forward_once(&orchestrator).await?;
        assert_eq!(mappings.len(), 1);
        Ok(())
    }
}
