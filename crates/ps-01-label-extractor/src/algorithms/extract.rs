//! # Label Extraction
//!
//! `extract` is a pure function of the workload and the label keys. Outputs
//! of the two dialects are concatenated in label order (host-referenced
//! first) and are not deduplicated.

use shared_types::{parse_port_mapping, PortMapping, Protocol};
use tracing::{debug, warn};

use crate::config::LabelConfig;
use crate::domain::{
    ContainerInfo, Dialect, DirectiveError, DIRECTIVE_SEPARATOR, PUBLISHED_DIRECTIVE,
};

/// Extractor bound to a set of label keys.
#[derive(Clone, Debug, Default)]
pub struct LabelExtractor {
    config: LabelConfig,
}

impl LabelExtractor {
    /// Create an extractor reading the given label keys.
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    /// Label keys in use.
    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Extract every mapping the workload's labels ask for.
    pub fn extract(&self, info: &ContainerInfo) -> Vec<PortMapping> {
        extract(info, &self.config)
    }
}

/// Extract mappings from both label dialects.
///
/// A workload carrying neither label yields an empty list.
pub fn extract(info: &ContainerInfo, labels: &LabelConfig) -> Vec<PortMapping> {
    let mut mappings = Vec::new();

    if let Some(value) = info.label(&labels.forward_label) {
        mappings.extend(extract_dialect(value, Dialect::HostReferenced, info));
    }
    if let Some(value) = info.label(&labels.container_label) {
        mappings.extend(extract_dialect(value, Dialect::ContainerReferenced, info));
    }

    if !mappings.is_empty() {
        debug!(
            "[ps-01] Extracted {} mapping(s) from workload {}",
            mappings.len(),
            info.display_name
        );
    }
    mappings
}

fn extract_dialect(value: &str, dialect: Dialect, info: &ContainerInfo) -> Vec<PortMapping> {
    let mut mappings = Vec::new();
    for directive in value
        .split(DIRECTIVE_SEPARATOR)
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        match parse_directive(directive, dialect, info) {
            Ok(found) => mappings.extend(found),
            Err(e) => {
                warn!(
                    workload = info.short_id(),
                    "[ps-01] Skipping directive: {}", e
                );
            }
        }
    }
    mappings
}

/// Resolve one directive against a workload.
///
/// An unmatched container port is not an error: it yields an empty list.
pub fn parse_directive(
    directive: &str,
    dialect: Dialect,
    info: &ContainerInfo,
) -> Result<Vec<PortMapping>, DirectiveError> {
    if directive == PUBLISHED_DIRECTIVE {
        return Ok(expand_published(info));
    }

    match dialect {
        Dialect::HostReferenced => {
            let mapping =
                parse_port_mapping(directive).map_err(|source| DirectiveError::InvalidMapping {
                    directive: directive.to_string(),
                    source,
                })?;
            Ok(vec![mapping.with_name(info.display_name.clone())])
        }
        Dialect::ContainerReferenced => resolve_container_port(directive, info),
    }
}

fn resolve_container_port(
    directive: &str,
    info: &ContainerInfo,
) -> Result<Vec<PortMapping>, DirectiveError> {
    let (port, protocol) = match directive.split_once('/') {
        Some((port, proto)) => (port, proto.parse::<Protocol>().unwrap_or(Protocol::Tcp)),
        None => (directive, Protocol::Tcp),
    };

    let private_port = port
        .parse::<u16>()
        .map_err(|_| DirectiveError::InvalidContainerPort(port.to_string()))?;

    let Some(binding) = info.published_binding(private_port) else {
        return Ok(Vec::new());
    };

    let mapping = PortMapping::new(binding.public_port, private_port, protocol).map_err(
        |source| DirectiveError::InvalidMapping {
            directive: directive.to_string(),
            source,
        },
    )?;
    Ok(vec![mapping.with_name(info.display_name.clone())])
}

fn expand_published(info: &ContainerInfo) -> Vec<PortMapping> {
    let mut mappings = Vec::new();
    for binding in info.ports.iter().filter(|b| b.is_published()) {
        let mapping = binding
            .transport
            .parse::<Protocol>()
            .and_then(|protocol| {
                PortMapping::new(binding.public_port, binding.private_port, protocol)
            });
        match mapping {
            Ok(m) => mappings.push(m.with_name(info.display_name.clone())),
            Err(source) => {
                let err = DirectiveError::UnsupportedBinding {
                    private_port: binding.private_port,
                    transport: binding.transport.clone(),
                    source,
                };
                warn!(
                    workload = info.short_id(),
                    "[ps-01] Skipping published port: {}", err
                );
            }
        }
    }
    mappings
}
