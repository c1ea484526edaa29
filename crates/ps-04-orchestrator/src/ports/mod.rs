//! # Ports Module
//!
//! The orchestrator depends on the provider and gateway inbound ports of
//! subsystems 02 and 03; it only defines its own inbound API.

pub mod inbound;

pub use inbound::*;
