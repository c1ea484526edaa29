//! # Domain Errors
//!
//! Provider and collaborator error types.

use shared_types::MappingError;
use thiserror::Error;

/// Failures reported by the workload-inspection collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    /// No workload with this identifier.
    #[error("workload not found: {0}")]
    NotFound(String),

    /// The runtime could not be reached or answered with an error.
    #[error("workload runtime unavailable: {0}")]
    Unavailable(String),

    /// The lifecycle event stream failed.
    #[error("event stream failed: {0}")]
    Stream(String),
}

/// Errors from a pull provider. Each one aborts the whole call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// A configured entry failed validation.
    #[error("invalid port mapping at index {index}: {source}")]
    InvalidEntry {
        /// Position of the entry in the configured list.
        index: usize,
        /// Validation error.
        source: MappingError,
    },

    /// Listing running workloads failed.
    #[error("failed to list workloads: {0}")]
    Collaborator(#[from] InspectError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::PortField;

    #[test]
    fn test_invalid_entry_is_index_annotated() {
        let err = ProviderError::InvalidEntry {
            index: 3,
            source: MappingError::Range {
                field: PortField::External,
                value: 0,
            },
        };
        assert!(err.to_string().starts_with("invalid port mapping at index 3"));
    }

    #[test]
    fn test_collaborator_from_inspect_error() {
        let err: ProviderError = InspectError::Unavailable("socket closed".to_string()).into();
        assert!(err.to_string().contains("socket closed"));
    }
}
