//! # Constants and Invariants
//!
//! Fixed values of the gateway protocol and of this client.

use std::net::Ipv4Addr;
use std::time::Duration;

/// UPnP fault code meaning "no entry at this index"; ends enumeration.
pub const SPECIFIED_ARRAY_INDEX_INVALID: u16 = 713;

/// Remote host wildcard sent on every add and delete.
pub const WILDCARD_REMOTE_HOST: &str = "";

/// Prefix of every mapping description.
pub const DEFAULT_DESCRIPTION_PREFIX: &str = "Portside";

/// Lease requested for each mapping.
pub const DEFAULT_LEASE_DURATION: Duration = Duration::from_secs(60 * 60);

/// Upper bound on network discovery.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Local address reported in dry-run mode when none is configured.
pub const DRY_RUN_LOCAL_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 100);

/// External address reported by the echo connection.
pub const ECHO_EXTERNAL_IP: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 1);

/// Gateway description for a mapping: the prefix alone for unnamed
/// mappings, `"<prefix>: <name>"` otherwise.
pub fn describe(prefix: &str, name: &str) -> String {
    if name.is_empty() {
        prefix.to_string()
    } else {
        format!("{}: {}", prefix, name)
    }
}

/// Lease in whole seconds, saturating at the protocol maximum.
pub fn lease_seconds(lease: Duration) -> u32 {
    u32::try_from(lease.as_secs()).unwrap_or(u32::MAX)
}
