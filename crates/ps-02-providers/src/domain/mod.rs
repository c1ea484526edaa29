//! # Domain Module
//!
//! Workload and event types consumed by the providers.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
