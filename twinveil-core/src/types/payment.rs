//! Payment types: what a sender emits and what a scan consumes and yields.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{PackedPoint, ViewTag};
use crate::constants::SPENDING_KEY_PREFIX;
use crate::error::{Result, TwinveilError};

// ═══════════════════════════════════════════════════════════════════════════════
// SEND PAYLOAD
// ═══════════════════════════════════════════════════════════════════════════════

/// Single-use output of one send operation.
///
/// `R` and `viewTag` are published so the recipient can find the payment;
/// funds go to the one-time `spendingPubKey`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPayload {
    /// Ephemeral public key R = r·G on the view curve
    #[serde(rename = "R")]
    pub ephemeral_key: PackedPoint,
    /// View tag pre-filter
    #[serde(rename = "viewTag")]
    pub view_tag: ViewTag,
    /// One-time spending public key P = b·K on the spend curve
    #[serde(rename = "spendingPubKey")]
    pub spending_pk: PackedPoint,
}

impl SendPayload {
    /// Returns the part of the payload a recipient scans.
    pub fn to_candidate(&self) -> ScanCandidate {
        ScanCandidate::new(self.ephemeral_key.clone(), self.view_tag.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCAN CANDIDATE
// ═══════════════════════════════════════════════════════════════════════════════

/// One observed payment supplied to a scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCandidate {
    /// Declared ephemeral public key R
    #[serde(rename = "R")]
    pub ephemeral_key: PackedPoint,
    /// Declared view tag
    #[serde(rename = "viewTag")]
    pub view_tag: ViewTag,
}

impl ScanCandidate {
    /// Creates a candidate.
    pub fn new(ephemeral_key: PackedPoint, view_tag: ViewTag) -> Self {
        Self {
            ephemeral_key,
            view_tag,
        }
    }

    /// Zips parallel `Rs` / `viewTags` arrays into candidates, preserving order.
    ///
    /// # Errors
    /// Returns [`TwinveilError::MalformedInput`] when the arrays differ in length.
    pub fn zip_parallel(rs: Vec<String>, view_tags: Vec<String>) -> Result<Vec<Self>> {
        if rs.len() != view_tags.len() {
            return Err(TwinveilError::MalformedInput(format!(
                "Rs has {} entries but viewTags has {}",
                rs.len(),
                view_tags.len()
            )));
        }

        Ok(rs
            .into_iter()
            .zip(view_tags)
            .map(|(r, tag)| Self::new(PackedPoint::new(r), ViewTag::new(tag)))
            .collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCAN RESULT
// ═══════════════════════════════════════════════════════════════════════════════

/// A derived one-time spending private key in its wire form (`0x` + hex).
///
/// Zeroized on drop; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SpendingPrivKey(String);

impl SpendingPrivKey {
    /// Wraps 64 hex digits, adding the `0x` prefix.
    pub fn from_hex_digits(digits: &str) -> Self {
        Self(format!("{}{}", SPENDING_KEY_PREFIX, digits))
    }

    /// Returns the prefixed hex string. Handle with care.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the hex digits without the prefix.
    pub fn hex_digits(&self) -> &str {
        self.0.strip_prefix(SPENDING_KEY_PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Debug for SpendingPrivKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpendingPrivKey([REDACTED])")
    }
}

/// Spending key material for one matched candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// One-time spending private key k·b mod n
    #[serde(rename = "spendingPrivKey")]
    pub spending_sk: SpendingPrivKey,
    /// One-time spending public key (k·b)·G
    #[serde(rename = "spendingPubKey")]
    pub spending_pk: PackedPoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_payload_wire_names() {
        let payload = SendPayload {
            ephemeral_key: PackedPoint::new("1.2"),
            view_tag: ViewTag::new("ab"),
            spending_pk: PackedPoint::new("3.4"),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["R"], "1.2");
        assert_eq!(json["viewTag"], "ab");
        assert_eq!(json["spendingPubKey"], "3.4");

        let candidate = payload.to_candidate();
        assert_eq!(candidate.ephemeral_key, payload.ephemeral_key);
        assert_eq!(candidate.view_tag, payload.view_tag);
    }

    #[test]
    fn test_zip_parallel_preserves_order() {
        let candidates = ScanCandidate::zip_parallel(
            vec!["1.2".into(), "3.4".into()],
            vec!["aa".into(), "bb".into()],
        )
        .unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].ephemeral_key.as_str(), "1.2");
        assert_eq!(candidates[1].view_tag.as_str(), "bb");
    }

    #[test]
    fn test_zip_parallel_length_mismatch() {
        let result = ScanCandidate::zip_parallel(vec!["1.2".into()], vec![]);
        assert!(matches!(result, Err(TwinveilError::MalformedInput(_))));
    }

    #[test]
    fn test_zip_parallel_empty() {
        assert!(ScanCandidate::zip_parallel(vec![], vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_spending_priv_key_redacted() {
        let key = SpendingPrivKey::from_hex_digits("ab");
        assert_eq!(key.expose(), "0xab");
        assert_eq!(key.hex_digits(), "ab");
        assert!(!format!("{:?}", key).contains("ab"));
    }
}
