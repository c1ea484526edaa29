//! # Label Configuration
//!
//! Keys of the two label dialects.

use serde::{Deserialize, Serialize};

/// Default prefix shared by both label keys.
pub const DEFAULT_LABEL_PREFIX: &str = "portside";

/// Label keys the extractor reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Host-referenced dialect (`<ext>:<int>/<proto>` directives).
    pub forward_label: String,

    /// Container-referenced dialect (`<int>[/<proto>]` directives).
    pub container_label: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_LABEL_PREFIX)
    }
}

impl LabelConfig {
    /// Build both keys under a custom prefix, e.g. `acme` gives
    /// `acme.forward` and `acme.forward.container`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            forward_label: format!("{prefix}.forward"),
            container_label: format!("{prefix}.forward.container"),
        }
    }
}
