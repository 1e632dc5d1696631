//! Packed point and curve identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::constants::{SPEND_CURVE_NAME, VIEW_CURVE_NAME};
use crate::error::{Result, TwinveilError};

// ═══════════════════════════════════════════════════════════════════════════════
// PACKED POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// A curve point in its wire form `"<decimal-x>.<decimal-y>"`.
///
/// Holding a `PackedPoint` says nothing about validity; points crossing the
/// boundary stay unchecked until unpacked onto a curve.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedPoint(String);

impl PackedPoint {
    /// Wraps a packed string as received from the wire.
    pub fn new(packed: impl Into<String>) -> Self {
        Self(packed.into())
    }

    /// Packs two decimal coordinates.
    pub fn from_coordinates(x: &str, y: &str) -> Self {
        Self(codec::encode_point(x, y))
    }

    /// Splits into raw coordinate strings.
    ///
    /// # Errors
    /// Returns `InvalidEncoding` if the delimiter is absent.
    pub fn coordinates(&self) -> Result<(&str, &str)> {
        codec::decode_point(&self.0)
    }

    /// Returns the packed string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the point, returning the packed string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PackedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PackedPoint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PackedPoint {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CURVE KIND
// ═══════════════════════════════════════════════════════════════════════════════

/// Which of the two protocol curves a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    /// secp256k1, carries spending keys
    #[serde(alias = "secp256k1")]
    Spend,
    /// BN254 G1, carries viewing and ephemeral keys
    #[serde(alias = "bn254")]
    View,
}

impl CurveKind {
    /// Returns the curve's conventional name.
    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::Spend => SPEND_CURVE_NAME,
            CurveKind::View => VIEW_CURVE_NAME,
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveKind {
    type Err = TwinveilError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spend" | "secp256k1" => Ok(CurveKind::Spend),
            "view" | "bn254" => Ok(CurveKind::View),
            other => Err(TwinveilError::MalformedInput(format!("unknown curve '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_point_roundtrip() {
        let p = PackedPoint::from_coordinates("123", "456");
        assert_eq!(p.as_str(), "123.456");
        assert_eq!(p.coordinates().unwrap(), ("123", "456"));
        assert_eq!(p.to_string(), "123.456");
    }

    #[test]
    fn test_packed_point_serde_is_transparent() {
        let p = PackedPoint::new("1.2");
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"1.2\"");
        let back: PackedPoint = serde_json::from_str("\"1.2\"").unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_curve_kind_parsing() {
        assert_eq!("secp256k1".parse::<CurveKind>().unwrap(), CurveKind::Spend);
        assert_eq!("BN254".parse::<CurveKind>().unwrap(), CurveKind::View);
        assert_eq!("view".parse::<CurveKind>().unwrap(), CurveKind::View);
        assert!("ed25519".parse::<CurveKind>().is_err());
    }
}
