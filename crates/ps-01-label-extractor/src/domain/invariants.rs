//! # Domain Invariants
//!
//! Constants and helpers every extraction path shares.

/// Length of the identifier prefix used when a workload has no name.
pub const SHORT_ID_LEN: usize = 12;

/// Directive that republishes every published binding.
pub const PUBLISHED_DIRECTIVE: &str = "published";

/// Separator between directives in a label value.
pub const DIRECTIVE_SEPARATOR: char = ',';

/// First [`SHORT_ID_LEN`] characters of an identifier, or the whole
/// identifier when it is shorter.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_truncates() {
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
    }

    #[test]
    fn test_short_id_keeps_short_ids() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
        assert_eq!(short_id("0123456789ab"), "0123456789ab");
    }
}
