//! # Domain Errors
//!
//! Reasons a single label directive is rejected. These are logged and the
//! directive skipped; they never fail the extraction as a whole.

use shared_types::MappingError;
use thiserror::Error;

/// A rejected label directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    /// Host-referenced directive that does not parse as a mapping.
    #[error("invalid port mapping {directive:?}: {source}")]
    InvalidMapping {
        /// The directive text.
        directive: String,
        /// Parser error.
        source: MappingError,
    },

    /// Container-referenced directive whose port is not a number.
    #[error("invalid container port {0:?}")]
    InvalidContainerPort(String),

    /// A published binding whose transport cannot be mapped.
    #[error("unsupported binding {private_port}/{transport}: {source}")]
    UnsupportedBinding {
        /// Port inside the workload.
        private_port: u16,
        /// Transport type reported by the runtime.
        transport: String,
        /// Validation error.
        source: MappingError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_container_port_message() {
        let err = DirectiveError::InvalidContainerPort("http".to_string());
        assert_eq!(err.to_string(), "invalid container port \"http\"");
    }

    #[test]
    fn test_invalid_mapping_message() {
        let err = DirectiveError::InvalidMapping {
            directive: "8080:80/xyz".to_string(),
            source: MappingError::Format("bad protocol".to_string()),
        };
        assert!(err.to_string().contains("8080:80/xyz"));
    }
}
