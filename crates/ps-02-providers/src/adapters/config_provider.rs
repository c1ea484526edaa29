//! Provider backed by configured entries.

use async_trait::async_trait;
use shared_types::{PortMapping, PortMappingEntry};
use tracing::debug;

use crate::domain::ProviderError;
use crate::ports::PortProvider;

/// Serves the configured mapping list.
///
/// Entries are validated on every call; a single invalid entry fails the
/// whole call.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    entries: Option<Vec<PortMappingEntry>>,
}

impl ConfigProvider {
    /// Create a provider. `None` means no backing configuration.
    pub fn new(entries: Option<Vec<PortMappingEntry>>) -> Self {
        Self { entries }
    }

    /// Create a provider from already-validated mappings.
    pub fn from_mappings(mappings: &[PortMapping]) -> Self {
        Self::new(Some(mappings.iter().map(PortMappingEntry::from).collect()))
    }
}

#[async_trait]
impl PortProvider for ConfigProvider {
    fn name(&self) -> &'static str {
        "config"
    }

    async fn get_port_mappings(&self) -> Result<Vec<PortMapping>, ProviderError> {
        let Some(entries) = &self.entries else {
            return Ok(Vec::new());
        };

        let mappings = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .validate()
                    .map_err(|source| ProviderError::InvalidEntry { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = mappings.len(), "[ps-02] Loaded configured mappings");
        Ok(mappings)
    }
}
