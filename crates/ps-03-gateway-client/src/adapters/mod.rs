//! # Adapters Layer (Hexagonal Architecture)
//!
//! Connection and host-network adapters.

mod echo;
mod local_ip;

pub use echo::EchoConnection;
pub use local_ip::{detect_local_ipv4, first_non_loopback_ipv4};
