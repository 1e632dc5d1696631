//! Spend curve (secp256k1) points and scalars.
//!
//! Spending keys and one-time spending keys live here. Arithmetic is
//! delegated to `k256`.

use std::fmt;

use k256::elliptic_curve::bigint::{U256, U512};
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use twinveil_core::codec::{decode_scalar_hex, encode_scalar_hex};
use twinveil_core::constants::{SCALAR_SIZE, SPEND_CURVE_NAME};
use twinveil_core::error::{Result, TwinveilError};
use twinveil_core::traits::{CurvePoint, SecretScalar};

use crate::random::wide_random_bytes;

// ═══════════════════════════════════════════════════════════════════════════════
// POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// An affine point on secp256k1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpendPoint(AffinePoint);

impl SpendPoint {
    /// Computes `scalar · G`.
    pub fn mul_base(scalar: &SpendScalar) -> Self {
        Self((ProjectivePoint::GENERATOR * scalar.0).to_affine())
    }

    /// Computes `scalar · self`.
    pub fn mul(&self, scalar: &SpendScalar) -> Self {
        Self((ProjectivePoint::from(self.0) * scalar.0).to_affine())
    }

    /// Returns true for the point at infinity.
    pub fn is_identity(&self) -> bool {
        self.0 == AffinePoint::IDENTITY
    }

    /// Returns the underlying `k256` point.
    pub fn as_affine(&self) -> &AffinePoint {
        &self.0
    }
}

impl CurvePoint for SpendPoint {
    const CURVE_NAME: &'static str = SPEND_CURVE_NAME;

    fn from_decimal_coordinates(x: &str, y: &str) -> Result<Self> {
        let x = decimal_to_field_bytes(x)?;
        let y = decimal_to_field_bytes(y)?;

        // Coordinates >= p fail here as well as off-curve points.
        let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(Self)
            .ok_or_else(|| TwinveilError::invalid_point(SPEND_CURVE_NAME, "not on curve"))
    }

    fn to_decimal_coordinates(&self) -> Result<(String, String)> {
        let encoded = self.0.to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => Ok((
                BigUint::from_bytes_be(x).to_str_radix(10),
                BigUint::from_bytes_be(y).to_str_radix(10),
            )),
            _ => Err(TwinveilError::invalid_point(
                SPEND_CURVE_NAME,
                "identity has no affine coordinates",
            )),
        }
    }
}

/// Parses a decimal string into a 32-byte big-endian field encoding.
fn decimal_to_field_bytes(s: &str) -> Result<FieldBytes> {
    let value = BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| TwinveilError::InvalidEncoding(format!("'{}' is not decimal", s)))?;
    let bytes = value.to_bytes_be();
    if bytes.len() > SCALAR_SIZE {
        return Err(TwinveilError::invalid_point(
            SPEND_CURVE_NAME,
            "coordinate exceeds field size",
        ));
    }

    let mut out = FieldBytes::default();
    out[SCALAR_SIZE - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCALARS
// ═══════════════════════════════════════════════════════════════════════════════

/// A secret scalar modulo the secp256k1 group order.
///
/// Zeroized on drop; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SpendScalar(Scalar);

impl SpendScalar {
    /// Draws a uniform scalar from a cryptographically secure source.
    ///
    /// # Errors
    /// Returns `CryptoFailure` if the source fails.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let mut wide = wide_random_bytes(rng)?;
        let scalar = <Scalar as Reduce<U512>>::reduce(U512::from_be_slice(&wide));
        wide.zeroize();

        if bool::from(scalar.is_zero()) {
            return Err(TwinveilError::CryptoFailure("sampled zero spend scalar".into()));
        }
        Ok(Self(scalar))
    }

    /// Reduces 32 big-endian bytes modulo the group order.
    pub fn reduce_be_bytes(bytes: &[u8; SCALAR_SIZE]) -> Self {
        Self(<Scalar as Reduce<U256>>::reduce(U256::from_be_slice(bytes)))
    }

    /// Returns `self · other mod n`.
    pub fn mul(&self, other: &SpendScalar) -> Self {
        Self(self.0 * other.0)
    }

    /// Returns true for the zero scalar.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero().into()
    }

    /// Returns the 32-byte big-endian encoding.
    pub fn to_be_bytes(&self) -> [u8; SCALAR_SIZE] {
        let mut out = [0u8; SCALAR_SIZE];
        out.copy_from_slice(&self.0.to_bytes());
        out
    }
}

impl SecretScalar for SpendScalar {
    const CURVE_NAME: &'static str = SPEND_CURVE_NAME;

    fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = decode_scalar_hex(s)?;
        let parsed = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(bytes)));
        bytes.zeroize();

        let scalar = parsed.ok_or_else(|| {
            TwinveilError::InvalidEncoding(format!("{} scalar is not below the group order", SPEND_CURVE_NAME))
        })?;
        if bool::from(scalar.is_zero()) {
            return Err(TwinveilError::InvalidEncoding(format!("{} scalar is zero", SPEND_CURVE_NAME)));
        }
        Ok(Self(scalar))
    }

    fn to_hex(&self) -> String {
        let mut bytes = self.to_be_bytes();
        let hex = encode_scalar_hex(&bytes);
        bytes.zeroize();
        hex
    }
}

impl Zeroize for SpendScalar {
    fn zeroize(&mut self) {
        self.0 = Scalar::ZERO;
    }
}

impl Drop for SpendScalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for SpendScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpendScalar([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use twinveil_core::codec::is_valid_point;

    // secp256k1 generator
    const GX: &str = "55066263022277343669578718895168534326250603453777594175500187360389116729240";
    const GY: &str = "32670510020758816978083085130507043184471273380659243275938904335757337482424";

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(7)
    }

    #[test]
    fn test_generator_coordinates() {
        let one = SpendScalar::from_hex("1").unwrap();
        let g = SpendPoint::mul_base(&one);
        let (x, y) = g.to_decimal_coordinates().unwrap();
        assert_eq!(x, GX);
        assert_eq!(y, GY);
    }

    #[test]
    fn test_generator_is_valid() {
        let packed = format!("{}.{}", GX, GY);
        assert!(is_valid_point::<SpendPoint>(&packed));
    }

    #[test]
    fn test_perturbed_point_is_invalid() {
        let y = (BigUint::parse_bytes(GY.as_bytes(), 10).unwrap() + 1u32).to_str_radix(10);
        let packed = format!("{}.{}", GX, y);
        assert!(!is_valid_point::<SpendPoint>(&packed));
    }

    #[test]
    fn test_oversized_coordinate_is_invalid() {
        let huge = "9".repeat(100);
        let packed = format!("{}.{}", huge, GY);
        let err = twinveil_core::codec::parse_point::<SpendPoint>(&packed).unwrap_err();
        assert!(matches!(err, TwinveilError::InvalidPoint { .. }));
    }

    #[test]
    fn test_random_public_key_packs_and_unpacks() {
        let k = SpendScalar::random(&mut rng()).unwrap();
        let public = SpendPoint::mul_base(&k);
        let packed = public.pack().unwrap();
        assert_eq!(SpendPoint::unpack(&packed).unwrap(), public);
    }

    #[test]
    fn test_scalar_hex_roundtrip() {
        let k = SpendScalar::random(&mut rng()).unwrap();
        let hex = k.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(SpendScalar::from_hex(&hex).unwrap(), k);
    }

    #[test]
    fn test_scalar_rejects_zero_and_order() {
        assert!(SpendScalar::from_hex("0").is_err());
        // group order n
        let n = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
        assert!(SpendScalar::from_hex(n).is_err());
    }

    #[test]
    fn test_mul_associates_with_point_mul() {
        let k = SpendScalar::random(&mut rng()).unwrap();
        let b = SpendScalar::from_hex("1234").unwrap();
        let lhs = SpendPoint::mul_base(&k.mul(&b));
        let rhs = SpendPoint::mul_base(&k).mul(&b);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_debug_is_redacted() {
        let k = SpendScalar::from_hex("abcdef").unwrap();
        assert_eq!(format!("{:?}", k), "SpendScalar([REDACTED])");
    }
}
