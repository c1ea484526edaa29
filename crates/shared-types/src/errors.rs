//! # Error Types
//!
//! Errors raised while building or validating a port mapping. All of them are
//! terminal for the single input that produced them and are never retried.

use std::fmt;
use thiserror::Error;

/// Which side of a mapping a port value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortField {
    /// Port opened on the gateway.
    External,
    /// Port the traffic is delivered to on this host.
    Internal,
}

impl fmt::Display for PortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortField::External => write!(f, "external port"),
            PortField::Internal => write!(f, "internal port"),
        }
    }
}

/// Errors that can occur when parsing or validating a port mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The textual form does not follow `[<ext>][:<int>][/<proto>]`.
    #[error("Invalid format: {0}")]
    Format(String),

    /// A port lies outside `1..=65535`.
    #[error("Invalid {field}: must be between 1 and 65535, got {value}")]
    Range {
        /// Offending side of the mapping.
        field: PortField,
        /// Value as it was supplied.
        value: i64,
    },

    /// The protocol is neither TCP nor UDP.
    #[error("Invalid protocol: must be TCP or UDP, got {0:?}")]
    Protocol(String),
}

impl MappingError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        MappingError::Format(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_names_field_and_value() {
        let err = MappingError::Range {
            field: PortField::Internal,
            value: 65536,
        };
        let msg = err.to_string();
        assert!(msg.contains("internal port"));
        assert!(msg.contains("65536"));
    }

    #[test]
    fn test_protocol_error_quotes_input() {
        let err = MappingError::Protocol("sctp".to_string());
        assert!(err.to_string().contains("\"sctp\""));
    }

    #[test]
    fn test_format_error() {
        let err = MappingError::format("port cannot be empty");
        assert_eq!(err.to_string(), "Invalid format: port cannot be empty");
    }
}
