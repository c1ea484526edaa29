//! # PS-01 Label Extractor
//!
//! Turns a workload's labels and published port bindings into port mappings.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Pure domain logic (no ports, no I/O)
//!
//! ## Label Dialects
//!
//! | Label | Directive | Meaning |
//! |-------|-----------|---------|
//! | `portside.forward` | `<ext>:<int>/<proto>` | Host-referenced mapping, parsed with the shared grammar |
//! | `portside.forward.container` | `<int>[/<proto>]` | Container port, resolved against published bindings |
//! | either | `published` | Republish every binding that has a host port |
//!
//! Both labels may be present on one workload; their outputs are concatenated.
//! A bad directive is logged and skipped without affecting the others.
//!
//! ## Module Structure
//!
//! ```text
//! ps-01-label-extractor/
//! ├── domain/          # ContainerInfo, PortBinding, Dialect, DirectiveError
//! ├── algorithms/      # Directive parsing and extraction
//! └── config.rs        # LabelConfig (label keys)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod config;
pub mod domain;

// Re-exports
pub use algorithms::{extract, parse_directive, LabelExtractor};
pub use config::{LabelConfig, DEFAULT_LABEL_PREFIX};
pub use domain::{
    short_id, ContainerInfo, Dialect, DirectiveError, PortBinding, PUBLISHED_DIRECTIVE,
    SHORT_ID_LEN,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
