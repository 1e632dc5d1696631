//! Common traits for Twinveil.
//!
//! The protocol is written against two curves. These traits capture what the
//! codec and the engines need from each of them, so that lexical handling of
//! the wire format lives in one place.

use crate::codec;
use crate::error::Result;
use crate::types::PackedPoint;

// ═══════════════════════════════════════════════════════════════════════════════
// CURVE POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// An affine point on a specific curve that can cross the wire.
pub trait CurvePoint: Sized {
    /// Human-readable curve name used in errors and logs.
    const CURVE_NAME: &'static str;

    /// Builds a point from decimal coordinates.
    ///
    /// # Errors
    /// - `InvalidEncoding` if a coordinate is not a decimal integer
    /// - `InvalidPoint` if a coordinate is not below the field modulus or the
    ///   coordinates do not satisfy the curve equation
    ///
    /// Coordinates are never reduced modulo p: `1 + p` is rejected, not read as `1`.
    fn from_decimal_coordinates(x: &str, y: &str) -> Result<Self>;

    /// Renders the affine coordinates as decimal strings.
    ///
    /// # Errors
    /// Fails for the identity, which has no affine coordinates.
    fn to_decimal_coordinates(&self) -> Result<(String, String)>;

    /// Packs the point into its wire form.
    fn pack(&self) -> Result<PackedPoint> {
        let (x, y) = self.to_decimal_coordinates()?;
        Ok(PackedPoint::from_coordinates(&x, &y))
    }

    /// Parses and validates a packed point.
    fn unpack(packed: &PackedPoint) -> Result<Self> {
        codec::parse_point(packed.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SECRET SCALARS
// ═══════════════════════════════════════════════════════════════════════════════

/// A secret scalar of a specific curve's group order.
pub trait SecretScalar: Sized {
    /// Human-readable curve name used in errors and logs.
    const CURVE_NAME: &'static str;

    /// Parses a big-endian hex scalar (optional `0x` prefix, 1..=64 digits).
    ///
    /// # Errors
    /// `InvalidEncoding` for malformed hex, values not below the group
    /// order, and zero.
    fn from_hex(s: &str) -> Result<Self>;

    /// Renders the scalar as 64 lowercase, zero-padded hex digits.
    fn to_hex(&self) -> String;
}
