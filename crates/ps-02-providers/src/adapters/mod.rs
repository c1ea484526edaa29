//! # Adapters Layer (Hexagonal Architecture)
//!
//! Provider implementations of the inbound port traits.

mod config_provider;
mod event_provider;
mod workload_provider;

pub use config_provider::ConfigProvider;
pub use event_provider::EventProvider;
pub use workload_provider::WorkloadProvider;
