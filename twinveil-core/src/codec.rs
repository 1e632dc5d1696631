//! Point and scalar codec.
//!
//! Curve points cross every boundary as `"<decimal-x>.<decimal-y>"`: unsigned
//! base-10 ASCII digits joined by [`POINT_DELIMITER`]. This module owns the
//! lexical side of that format. Whether the coordinates describe a point on a
//! particular curve is decided by a [`CurvePoint`] implementation.
//!
//! Secret scalars travel as big-endian hex. The lexical half of scalar
//! handling (prefix, padding, digit checks) is shared here by both curves.

use zeroize::Zeroize;

use crate::constants::{POINT_DELIMITER, SCALAR_HEX_LEN, SCALAR_SIZE, SPENDING_KEY_PREFIX};
use crate::error::{Result, TwinveilError};
use crate::traits::CurvePoint;

/// Joins two decimal coordinates with the point delimiter.
pub fn encode_point(x: &str, y: &str) -> String {
    let mut out = String::with_capacity(x.len() + y.len() + 1);
    out.push_str(x);
    out.push(POINT_DELIMITER);
    out.push_str(y);
    out
}

/// Splits a packed point at the first delimiter.
///
/// # Errors
/// Returns [`TwinveilError::InvalidEncoding`] if the delimiter is absent.
pub fn decode_point(s: &str) -> Result<(&str, &str)> {
    s.split_once(POINT_DELIMITER).ok_or_else(|| {
        TwinveilError::InvalidEncoding(format!("missing '{}' delimiter in point", POINT_DELIMITER))
    })
}

/// Returns true if `s` is a non-empty string of ASCII decimal digits.
pub fn is_decimal_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Splits a packed point and checks both coordinates are decimal digit strings.
///
/// # Errors
/// Returns [`TwinveilError::InvalidEncoding`] on a missing delimiter or an
/// empty or non-digit coordinate.
pub fn decode_decimal_point(s: &str) -> Result<(&str, &str)> {
    let (x, y) = decode_point(s)?;
    if !is_decimal_digits(x) {
        return Err(TwinveilError::InvalidEncoding(format!("x coordinate '{}' is not decimal", x)));
    }
    if !is_decimal_digits(y) {
        return Err(TwinveilError::InvalidEncoding(format!("y coordinate '{}' is not decimal", y)));
    }
    Ok((x, y))
}

/// Parses a packed point onto curve `P`.
pub fn parse_point<P: CurvePoint>(s: &str) -> Result<P> {
    let (x, y) = decode_decimal_point(s)?;
    P::from_decimal_coordinates(x, y)
}

/// Returns whether `s` is a well-formed point on curve `P`. Never fails.
///
/// No subgroup or identity check is made: both curves in use have cofactor
/// one and their identity has no affine encoding.
pub fn is_valid_point<P: CurvePoint>(s: &str) -> bool {
    parse_point::<P>(s).is_ok()
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCALARS
// ═══════════════════════════════════════════════════════════════════════════════

/// Strips an optional `0x`/`0X` prefix and surrounding whitespace.
pub fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    match s.get(..2) {
        Some(p) if p.eq_ignore_ascii_case(SPENDING_KEY_PREFIX) => &s[2..],
        _ => s,
    }
}

/// Decodes a big-endian hex scalar into 32 bytes.
///
/// Accepts an optional `0x` prefix and 1 to 64 hex digits of either case.
/// Shorter and odd-length inputs are left-padded with zeros.
///
/// # Errors
/// Returns [`TwinveilError::InvalidEncoding`] for empty, over-long or non-hex input.
pub fn decode_scalar_hex(s: &str) -> Result<[u8; SCALAR_SIZE]> {
    let digits = strip_hex_prefix(s);
    if digits.is_empty() {
        return Err(TwinveilError::InvalidEncoding("empty scalar".into()));
    }
    if digits.len() > SCALAR_HEX_LEN {
        return Err(TwinveilError::InvalidEncoding(format!(
            "scalar has {} hex digits, at most {} allowed",
            digits.len(),
            SCALAR_HEX_LEN
        )));
    }

    let mut padded = String::with_capacity(SCALAR_HEX_LEN);
    padded.extend(std::iter::repeat('0').take(SCALAR_HEX_LEN - digits.len()));
    padded.push_str(digits);

    let mut out = [0u8; SCALAR_SIZE];
    let decoded = hex::decode_to_slice(&padded, &mut out)
        .map_err(|e| TwinveilError::InvalidEncoding(format!("scalar is not hex: {}", e)));
    padded.zeroize();
    decoded?;
    Ok(out)
}

/// Encodes 32 scalar bytes as 64 lowercase hex digits.
pub fn encode_scalar_hex(bytes: &[u8; SCALAR_SIZE]) -> String {
    hex::encode(bytes)
}
