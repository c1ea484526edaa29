//! Provider backed by currently running workloads.

use std::sync::Arc;

use async_trait::async_trait;
use ps_01_label_extractor::LabelExtractor;
use shared_types::PortMapping;
use tracing::debug;

use crate::domain::ProviderError;
use crate::ports::{PortProvider, WorkloadInspector};

/// Extracts mappings from the labels of every running workload.
pub struct WorkloadProvider {
    inspector: Arc<dyn WorkloadInspector>,
    extractor: LabelExtractor,
}

impl WorkloadProvider {
    /// Create a provider over `inspector`.
    pub fn new(inspector: Arc<dyn WorkloadInspector>, extractor: LabelExtractor) -> Self {
        Self {
            inspector,
            extractor,
        }
    }
}

#[async_trait]
impl PortProvider for WorkloadProvider {
    fn name(&self) -> &'static str {
        "workload"
    }

    async fn get_port_mappings(&self) -> Result<Vec<PortMapping>, ProviderError> {
        let workloads = self.inspector.list_running().await?;

        let mut mappings = Vec::new();
        for workload in &workloads {
            let extracted = self.extractor.extract(&workload.container_info());
            debug!(
                workload = %workload.id,
                count = extracted.len(),
                "[ps-02] Extracted workload mappings"
            );
            mappings.extend(extracted);
        }
        Ok(mappings)
    }
}
