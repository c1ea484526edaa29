//! # Ports Module
//!
//! Hexagonal architecture ports for the gateway client.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
