//! # Orchestrator Configuration

use serde::{Deserialize, Serialize};

/// Default per-provider channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Orchestrator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Capacity of each provider's add and delete channel.
    pub channel_capacity: usize,

    /// Delete gateway mappings when their workload stops.
    pub cleanup_on_stop: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            cleanup_on_stop: false,
        }
    }
}

impl OrchestratorConfig {
    /// Create a config for testing (small queues, cleanup on).
    pub fn for_testing() -> Self {
        Self {
            channel_capacity: 4,
            cleanup_on_stop: true,
        }
    }

    /// Capacity actually used; channels need at least one slot.
    pub fn effective_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.channel_capacity, 64);
        assert!(!config.cleanup_on_stop);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = OrchestratorConfig {
            channel_capacity: 0,
            ..OrchestratorConfig::default()
        };
        assert_eq!(config.effective_capacity(), 1);
    }
}
