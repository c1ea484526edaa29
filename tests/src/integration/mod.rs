//! Cross-subsystem integration tests.

pub mod event_flows;
pub mod flows;
pub mod properties;
