//! # PS-02 Mapping Providers
//!
//! Sources of desired port mappings.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Providers
//!
//! | Provider | Contract | Source |
//! |----------|----------|--------|
//! | [`ConfigProvider`] | pull | Configured entries, validated per call |
//! | [`WorkloadProvider`] | pull | Running workloads, through the label extractor |
//! | [`EventProvider`] | push | Workload start/stop/die events |
//!
//! Pull providers implement [`PortProvider`]; failures are all-or-nothing.
//! Push providers implement [`EventPortProvider`] and feed add/delete
//! channels until cancelled; a bad event is logged and dropped.
//!
//! ## Module Structure
//!
//! ```text
//! ps-02-providers/
//! ├── domain/          # Workload, LifecycleEvent, PortEventChannels, errors
//! ├── ports/           # PortProvider/EventPortProvider (inbound), WorkloadInspector (outbound)
//! └── adapters/        # ConfigProvider, WorkloadProvider, EventProvider
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{ConfigProvider, EventProvider, WorkloadProvider};
pub use domain::{
    EventFilter, InspectError, LifecycleAction, LifecycleEvent, PortEventChannels,
    ProviderError, Workload, CONTAINER_EVENT_TYPE,
};
pub use ports::{
    EventPortProvider, MockWorkloadInspector, PortProvider, WorkloadEventStream,
    WorkloadInspector,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
