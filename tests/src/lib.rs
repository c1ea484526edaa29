//! # Portside Test Suite
//!
//! Flows that cross subsystem boundaries. Each subsystem's own behaviour is
//! tested inside its crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # Providers -> orchestrator -> gateway client
//!     ├── event_flows.rs  # Lifecycle events through the event loop
//!     └── properties.rs   # Label extraction and parsing properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ps-tests
//! cargo test -p ps-tests integration::event_flows
//! ```

pub mod integration;
