//! # PS-04 Orchestrator
//!
//! Composes the providers and the gateway client.
//!
//! **Subsystem ID:** 04
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Operations
//!
//! | Operation | Behaviour |
//! |-----------|-----------|
//! | `fetch_all` | Pull every static provider in order; first error aborts |
//! | `forward_all` | Forward a batch; logged no-op without a gateway |
//! | `run_event_loop` | Apply event provider adds (and optionally deletes) as they arrive |
//!
//! ## Event Loop Tasks
//!
//! ```text
//! EventPortProvider #0 ──add──┐                 ┌──► forward (main task)
//! EventPortProvider #1 ──add──┼──► StreamMap ───┤
//!        ...          ──del──┴──► StreamMap ───┴──► delete (drain task, cleanup only)
//! ```
//!
//! Each provider gets its own bounded channels, so a provider blocked on a
//! full queue never stalls another. All tasks stop when the token passed
//! to `run_event_loop` is cancelled.
//!
//! ## Module Structure
//!
//! ```text
//! ps-04-orchestrator/
//! ├── domain/          # OrchestratorError
//! ├── ports/           # OrchestratorApi (inbound)
//! ├── application/     # Orchestrator
//! └── config.rs        # OrchestratorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::Orchestrator;
pub use config::OrchestratorConfig;
pub use domain::OrchestratorError;
pub use ports::OrchestratorApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
