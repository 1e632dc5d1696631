//! View tag type.
//!
//! A view tag is a short lowercase hex string published with each payment.
//! Recipients recompute it from their viewing key and compare prefixes,
//! rejecting most foreign candidates without evaluating a pairing.

use std::fmt;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Hex view tag as carried on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewTag(String);

impl ViewTag {
    /// Wraps a tag string. Declared tags from the wire are taken as-is.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty tag produced when tags are disabled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks a declared tag against this expected tag.
    ///
    /// Only the first `self.len()` characters of `declared` take part, so a
    /// sender may publish a longer tag than the recipient checks. The
    /// comparison is ASCII case-insensitive and constant-time over the
    /// compared prefix. A declared tag shorter than the expected one never
    /// matches.
    pub fn matches_declared(&self, declared: &ViewTag) -> bool {
        let expected = self.0.as_bytes();
        let declared = declared.0.as_bytes();
        if declared.len() < expected.len() {
            return false;
        }

        let expected: Vec<u8> = expected.iter().map(u8::to_ascii_lowercase).collect();
        let prefix: Vec<u8> = declared[..expected.len()]
            .iter()
            .map(u8::to_ascii_lowercase)
            .collect();
        expected.ct_eq(&prefix).into()
    }
}

impl fmt::Display for ViewTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ViewTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ViewTag {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(ViewTag::new("a3").matches_declared(&ViewTag::new("a3")));
        assert!(!ViewTag::new("a3").matches_declared(&ViewTag::new("a4")));
    }

    #[test]
    fn test_longer_declared_tag_uses_prefix() {
        assert!(ViewTag::new("a3").matches_declared(&ViewTag::new("a3ff")));
        assert!(!ViewTag::new("a3").matches_declared(&ViewTag::new("ffa3")));
    }

    #[test]
    fn test_short_declared_tag_never_matches() {
        assert!(!ViewTag::new("a3").matches_declared(&ViewTag::new("a")));
        assert!(!ViewTag::new("a3").matches_declared(&ViewTag::new("")));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(ViewTag::new("a3").matches_declared(&ViewTag::new("A3")));
    }

    #[test]
    fn test_empty_expected_matches_anything() {
        assert!(ViewTag::default().matches_declared(&ViewTag::new("zz")));
        assert!(ViewTag::default().matches_declared(&ViewTag::default()));
    }

    #[test]
    fn test_non_ascii_declared_tag() {
        assert!(!ViewTag::new("a3").matches_declared(&ViewTag::new("é")));
    }
}
