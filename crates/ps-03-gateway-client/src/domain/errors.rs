//! # Domain Errors
//!
//! Faults raised by a gateway connection and the client errors built on
//! top of them.

use std::fmt;

use shared_types::PortMapping;
use thiserror::Error;

use super::invariants::SPECIFIED_ARRAY_INDEX_INVALID;

/// A failed call on a [`GatewayConnection`](crate::ports::GatewayConnection).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayFault {
    /// Fault returned by the gateway with a protocol error code.
    #[error("gateway fault {code}: {description}")]
    Upnp {
        /// Protocol error code.
        code: u16,
        /// Error description as sent by the gateway.
        description: String,
    },

    /// The call did not reach the gateway or the reply was unreadable.
    #[error("transport error: {0}")]
    Transport(String),
}

impl GatewayFault {
    /// The fault that ends enumeration.
    pub fn array_index_invalid() -> Self {
        GatewayFault::Upnp {
            code: SPECIFIED_ARRAY_INDEX_INVALID,
            description: "SpecifiedArrayIndexInvalid".to_string(),
        }
    }

    /// Whether this fault is the end-of-list signal. Matches on the code
    /// only; the description is informational.
    pub fn is_array_index_invalid(&self) -> bool {
        matches!(
            self,
            GatewayFault::Upnp { code, .. } if *code == SPECIFIED_ARRAY_INDEX_INVALID
        )
    }
}

/// One mapping that could not be forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardFailure {
    /// The mapping.
    pub mapping: PortMapping,
    /// Why the gateway refused it.
    pub fault: GatewayFault,
}

impl fmt::Display for ForwardFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.mapping, self.fault)
    }
}

/// Gateway client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No reachable gateway.
    #[error("gateway discovery failed: {0}")]
    Discovery(String),

    /// No usable local IPv4 address.
    #[error("failed to determine local IP: {0}")]
    LocalIp(String),

    /// A single gateway call failed.
    #[error("{operation} failed: {fault}")]
    Call {
        /// Operation name.
        operation: &'static str,
        /// Underlying fault.
        fault: GatewayFault,
    },

    /// Some mappings of a batch were not forwarded. The others were.
    #[error("failed to forward {} mapping(s): {}", .failures.len(), join_failures(.failures))]
    Forward {
        /// Every failed mapping in input order.
        failures: Vec<ForwardFailure>,
    },

    /// Enumeration failed with a fault other than the end-of-list signal.
    #[error("failed to get port mapping at index {index}: {fault}")]
    Enumeration {
        /// Index being fetched.
        index: u16,
        /// Underlying fault.
        fault: GatewayFault,
    },
}

fn join_failures(failures: &[ForwardFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Protocol;

    #[test]
    fn test_sentinel_matches_on_code_only() {
        assert!(GatewayFault::array_index_invalid().is_array_index_invalid());
        assert!(GatewayFault::Upnp {
            code: 713,
            description: "whatever".to_string()
        }
        .is_array_index_invalid());
        assert!(!GatewayFault::Upnp {
            code: 714,
            description: "SpecifiedArrayIndexInvalid".to_string()
        }
        .is_array_index_invalid());
        assert!(!GatewayFault::Transport("SpecifiedArrayIndexInvalid".to_string())
            .is_array_index_invalid());
    }

    #[test]
    fn test_forward_error_lists_failures() {
        let failure = ForwardFailure {
            mapping: PortMapping::new(8080, 80, Protocol::Tcp).unwrap().with_name("web"),
            fault: GatewayFault::Upnp {
                code: 718,
                description: "ConflictInMappingEntry".to_string(),
            },
        };
        let err = GatewayError::Forward {
            failures: vec![failure],
        };
        assert_eq!(
            err.to_string(),
            "failed to forward 1 mapping(s): 8080->80/TCP (web): gateway fault 718: ConflictInMappingEntry"
        );
    }

    #[test]
    fn test_enumeration_error_is_index_annotated() {
        let err = GatewayError::Enumeration {
            index: 4,
            fault: GatewayFault::Transport("timeout".to_string()),
        };
        assert!(err.to_string().contains("index 4"));
    }
}
