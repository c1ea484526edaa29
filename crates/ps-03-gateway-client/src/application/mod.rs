//! # Application Layer
//!
//! Gateway client service.

mod service;

pub use service::GatewayClient;
