//! DTOs for API requests and responses.
//!
//! Field names match the wire contract exactly (`k`, `v`, `K`, `V`, `r`, `R`,
//! `viewTag`, `spendingPubKey`, `Rs`, `viewTags`, `spendingPubKeys`,
//! `spendingPrivKeys`). DTOs carrying secrets are zeroized on drop.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use twinveil_core::types::{CurveKind, MetaAddress, SendPayload};

/// Response for key generation and recomputation.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeysResponse {
    /// Spending secret (hex) - HANDLE WITH CARE
    pub k: String,
    /// Viewing secret (hex) - HANDLE WITH CARE
    pub v: String,
    /// Spending public key (packed point)
    #[serde(rename = "K")]
    pub spending_pk: String,
    /// Viewing public key (packed point)
    #[serde(rename = "V")]
    pub viewing_pk: String,
}

impl fmt::Debug for KeysResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeysResponse")
            .field("k", &"[REDACTED]")
            .field("v", &"[REDACTED]")
            .field("K", &self.spending_pk)
            .field("V", &self.viewing_pk)
            .finish()
    }
}

/// Request to recompute a meta-address from secrets.
#[derive(Clone, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct RecomputeRequest {
    /// Spending secret (hex)
    pub k: String,
    /// Viewing secret (hex)
    pub v: String,
}

impl fmt::Debug for RecomputeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecomputeRequest([REDACTED])")
    }
}

/// Request to create a send payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SendRequest {
    /// Recipient's spending public key
    #[serde(rename = "K")]
    pub spending_pk: String,
    /// Recipient's viewing public key
    #[serde(rename = "V")]
    pub viewing_pk: String,
}

impl SendRequest {
    /// Converts to the recipient's meta-address (unvalidated).
    pub fn to_meta_address(&self) -> MetaAddress {
        MetaAddress::new(
            self.spending_pk.as_str().into(),
            self.viewing_pk.as_str().into(),
        )
    }
}

/// Response for send payload creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SendResponse {
    /// Ephemeral scalar in decimal, present only when exposure is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    /// R, viewTag and spendingPubKey
    #[serde(flatten)]
    pub payload: SendPayload,
}

/// Request to scan candidates.
#[derive(Clone, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct ScanRequest {
    /// Spending secret (hex)
    pub k: String,
    /// Viewing secret (hex)
    pub v: String,
    /// Ephemeral keys, parallel to `viewTags`
    #[serde(rename = "Rs")]
    pub rs: Vec<String>,
    /// Declared view tags, parallel to `Rs`
    #[serde(rename = "viewTags")]
    pub view_tags: Vec<String>,
}

impl fmt::Debug for ScanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanRequest")
            .field("k", &"[REDACTED]")
            .field("v", &"[REDACTED]")
            .field("candidates", &self.rs.len())
            .finish()
    }
}

/// Response for scanning. Arrays are parallel and in match order.
#[derive(Clone, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ScanResponse {
    /// One-time spending public keys
    #[serde(rename = "spendingPubKeys")]
    pub spending_pks: Vec<String>,
    /// One-time spending private keys (`0x` + hex) - HANDLE WITH CARE
    #[serde(rename = "spendingPrivKeys")]
    pub spending_sks: Vec<String>,
}

impl fmt::Debug for ScanResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanResponse")
            .field("spendingPubKeys", &self.spending_pks)
            .field("spendingPrivKeys", &"[REDACTED]")
            .finish()
    }
}

/// Request to validate a packed point.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ValidateRequest {
    /// Target curve (`spend`/`secp256k1` or `view`/`bn254`)
    pub curve: CurveKind,
    /// Packed point
    pub point: String,
}

/// Response for point validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    /// Whether the point is valid on the curve
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use twinveil_core::types::{PackedPoint, ViewTag};

    #[test]
    fn test_scan_request_wire_names() {
        let req: ScanRequest = serde_json::from_str(
            r#"{"k":"01","v":"02","Rs":["1.2"],"viewTags":["ab"]}"#,
        )
        .unwrap();
        assert_eq!(req.rs, vec!["1.2".to_string()]);
        assert_eq!(req.view_tags, vec!["ab".to_string()]);
        assert!(!format!("{:?}", req).contains("01"));
    }

    #[test]
    fn test_send_response_flattens_payload() {
        let payload = SendPayload {
            ephemeral_key: PackedPoint::new("1.2"),
            view_tag: ViewTag::new("ab"),
            spending_pk: PackedPoint::new("3.4"),
        };
        let with_r = SendResponse {
            r: Some("42".into()),
            payload: payload.clone(),
        };
        let json = serde_json::to_value(&with_r).unwrap();
        assert_eq!(json["r"], "42");
        assert_eq!(json["R"], "1.2");
        assert_eq!(json["viewTag"], "ab");
        assert_eq!(json["spendingPubKey"], "3.4");

        let without_r = SendResponse { r: None, payload };
        let json = serde_json::to_value(&without_r).unwrap();
        assert!(json.get("r").is_none());
    }

    #[test]
    fn test_curve_name_aliases() {
        let req: ValidateRequest = serde_json::from_str(r#"{"curve":"bn254","point":"1.2"}"#).unwrap();
        assert_eq!(req.curve, CurveKind::View);
        let req: ValidateRequest = serde_json::from_str(r#"{"curve":"spend","point":"1.2"}"#).unwrap();
        assert_eq!(req.curve, CurveKind::Spend);
    }

    #[test]
    fn test_keys_response_wire_names() {
        let keys = KeysResponse {
            k: "aa".into(),
            v: "bb".into(),
            spending_pk: "1.2".into(),
            viewing_pk: "3.4".into(),
        };
        let json = serde_json::to_value(&keys).unwrap();
        assert_eq!(json["k"], "aa");
        assert_eq!(json["K"], "1.2");
        assert_eq!(json["V"], "3.4");
        assert!(!format!("{:?}", keys).contains("aa"));
    }
}
