//! # Portside Telemetry
//!
//! Structured logging for every Portside subsystem.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portside_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PORTSIDE_LOG_LEVEL` | `info` | Filter directives, falls back to `RUST_LOG` |
//! | `PORTSIDE_JSON_LOGS` | `false` | One JSON object per line |
//! | `PORTSIDE_LOG_TARGET` | `true` | Include the module target |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directives did not parse.
    #[error("Invalid log filter {filter:?}: {reason}")]
    Filter {
        /// Directives as configured.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
