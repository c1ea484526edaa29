//! # Portside Runtime
//!
//! Composes the subsystems into a running daemon.
//!
//! ## Startup
//!
//! 1. Load [`RuntimeConfig`] from TOML, apply `PORTSIDE_*` overrides and
//!    install logging with [`init_logging`]
//! 2. Resolve the gateway; on failure keep running without one
//! 3. Register providers: configured ports always, workload labels and
//!    lifecycle events when an inspector is available
//! 4. Fetch and forward once
//! 5. Refresh on a fixed interval and, if enabled, run the event loop
//!
//! All long-running tasks share one cancellation token.
//!
//! ## Module Structure
//!
//! ```text
//! portside-runtime/
//! ├── config.rs        # RuntimeConfig, ConfigError
//! ├── errors.rs        # RuntimeError
//! ├── logging.rs       # init_logging over the [logging] section
//! ├── render.rs        # Mapping list and gateway table output
//! ├── commands.rs      # add / delete / list / forward_once
//! └── daemon.rs        # Daemon
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod config;
pub mod daemon;
pub mod errors;
pub mod logging;
pub mod render;

pub use commands::GatewayListing;
pub use config::{ConfigError, LoggingSection, RuntimeConfig};
pub use daemon::Daemon;
pub use errors::RuntimeError;
pub use logging::{init_logging, init_logging_over};
pub use render::{render_gateway_table, render_mappings};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
