//! # PS-03 Gateway Client
//!
//! Publishes port mappings on the local network gateway.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Wraps a pluggable low-level [`GatewayConnection`] with the four
//! operations the rest of the system needs:
//! - forward a batch of mappings
//! - delete one mapping
//! - enumerate the gateway's mapping table
//! - query the external address
//!
//! ## Resolution
//!
//! | Input | Behaviour |
//! |-------|-----------|
//! | `dry_run` | [`EchoConnection`], nothing leaves the process |
//! | `gateway_url` | Connect at the URL, newest protocol generation first |
//! | neither | Discover on the local network within `discovery_timeout` |
//!
//! ## Enumeration
//!
//! The gateway exposes no entry count. Entries are fetched by index until
//! the gateway answers with fault code [`SPECIFIED_ARRAY_INDEX_INVALID`];
//! any other fault aborts the listing.
//!
//! ## Module Structure
//!
//! ```text
//! ps-03-gateway-client/
//! ├── domain/          # GatewayMappingEntry, AddMappingRequest, GatewayFault, errors
//! ├── ports/           # GatewayApi (inbound), GatewayConnection/ConnectionFactory (outbound)
//! ├── adapters/        # EchoConnection, local address detection
//! ├── application/     # GatewayClient
//! └── config.rs        # GatewayClientConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{detect_local_ipv4, first_non_loopback_ipv4, EchoConnection};
pub use application::GatewayClient;
pub use config::GatewayClientConfig;
pub use domain::{
    describe, AddMappingRequest, ForwardFailure, GatewayError, GatewayFault,
    GatewayMappingEntry, Generation, DEFAULT_DESCRIPTION_PREFIX, DRY_RUN_LOCAL_IP,
    ECHO_EXTERNAL_IP, SPECIFIED_ARRAY_INDEX_INVALID, WILDCARD_REMOTE_HOST,
};
pub use ports::{
    ConnectionFactory, GatewayApi, GatewayConnection, MockConnectionFactory,
    RecordingConnection,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
