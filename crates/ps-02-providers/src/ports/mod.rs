//! # Ports Module
//!
//! Hexagonal architecture ports (inbound provider contracts, outbound
//! workload inspection).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
