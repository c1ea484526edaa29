//! # Domain Module
//!
//! Orchestrator errors.

pub mod errors;

pub use errors::*;
