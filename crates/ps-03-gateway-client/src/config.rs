//! # Gateway Client Configuration
//!
//! Fixed once at construction; nothing here changes at runtime.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{DEFAULT_DESCRIPTION_PREFIX, DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_LEASE_DURATION};

/// Gateway client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayClientConfig {
    /// Internal client address. Detected from local interfaces when unset.
    pub local_ip: Option<Ipv4Addr>,

    /// Gateway description URL. Discovered on the local network when unset.
    pub gateway_url: Option<Url>,

    /// Lease requested for each mapping, in seconds. 0 is permanent.
    pub lease_duration_secs: u64,

    /// Discovery timeout in seconds.
    pub discovery_timeout_secs: u64,

    /// Description prefix.
    pub description_prefix: String,

    /// Log requests instead of sending them.
    pub dry_run: bool,
}

impl Default for GatewayClientConfig {
    fn default() -> Self {
        Self {
            local_ip: None,
            gateway_url: None,
            lease_duration_secs: DEFAULT_LEASE_DURATION.as_secs(),
            discovery_timeout_secs: DEFAULT_DISCOVERY_TIMEOUT.as_secs(),
            description_prefix: DEFAULT_DESCRIPTION_PREFIX.to_string(),
            dry_run: false,
        }
    }
}

impl GatewayClientConfig {
    /// Create a config for testing (fixed local address, short timeout).
    pub fn for_testing() -> Self {
        Self {
            local_ip: Some(Ipv4Addr::new(192, 168, 1, 50)),
            discovery_timeout_secs: 1,
            lease_duration_secs: 120,
            ..Self::default()
        }
    }

    /// Lease as a duration.
    pub fn lease_duration(&self) -> Duration {
        Duration::from_secs(self.lease_duration_secs)
    }

    /// Discovery timeout as a duration.
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }
}
