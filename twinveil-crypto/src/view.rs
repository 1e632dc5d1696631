//! View curve (BN254 G1) points and scalars.
//!
//! Viewing keys, ephemeral keys and the Diffie-Hellman style shared point all
//! live in BN254 G1, the first source group of the pairing. Arithmetic is
//! delegated to arkworks.

use std::fmt;

use ark_bn254::{Fq, Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, PrimeField, Zero};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use twinveil_core::codec::{decode_scalar_hex, encode_scalar_hex};
use twinveil_core::constants::{SCALAR_SIZE, VIEW_CURVE_NAME};
use twinveil_core::error::{Result, TwinveilError};
use twinveil_core::traits::{CurvePoint, SecretScalar};

use crate::random::wide_random_bytes;

// ═══════════════════════════════════════════════════════════════════════════════
// POINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// An affine point on BN254 G1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewPoint(G1Affine);

impl ViewPoint {
    /// Computes `scalar · G1`.
    pub fn mul_base(scalar: &ViewScalar) -> Self {
        Self((G1Affine::generator() * scalar.0).into_affine())
    }

    /// Computes `scalar · self`.
    pub fn mul(&self, scalar: &ViewScalar) -> Self {
        Self((self.0 * scalar.0).into_affine())
    }

    /// Returns true for the point at infinity.
    pub fn is_identity(&self) -> bool {
        self.0.infinity
    }

    /// Returns the affine x coordinate as an integer (zero for the identity).
    pub fn x_integer(&self) -> BigUint {
        self.0.x.into()
    }

    /// Returns both coordinates as 32-byte big-endian encodings.
    pub fn coordinate_bytes(&self) -> ([u8; SCALAR_SIZE], [u8; SCALAR_SIZE]) {
        (field_to_be_bytes(&self.0.x), field_to_be_bytes(&self.0.y))
    }

    /// Returns the underlying arkworks point.
    pub fn as_affine(&self) -> &G1Affine {
        &self.0
    }
}

impl CurvePoint for ViewPoint {
    const CURVE_NAME: &'static str = VIEW_CURVE_NAME;

    fn from_decimal_coordinates(x: &str, y: &str) -> Result<Self> {
        let x = decimal_to_base_field(x)?;
        let y = decimal_to_base_field(y)?;

        // G1 has cofactor one, so being on the curve implies subgroup membership.
        let point = G1Affine::new_unchecked(x, y);
        if !point.is_on_curve() {
            return Err(TwinveilError::invalid_point(VIEW_CURVE_NAME, "not on curve"));
        }
        Ok(Self(point))
    }

    fn to_decimal_coordinates(&self) -> Result<(String, String)> {
        if self.is_identity() {
            return Err(TwinveilError::invalid_point(
                VIEW_CURVE_NAME,
                "identity has no affine coordinates",
            ));
        }
        let x: BigUint = self.0.x.into();
        let y: BigUint = self.0.y.into();
        Ok((x.to_str_radix(10), y.to_str_radix(10)))
    }
}

fn decimal_to_base_field(s: &str) -> Result<Fq> {
    let value = BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| TwinveilError::InvalidEncoding(format!("'{}' is not decimal", s)))?;
    if value >= BigUint::from(Fq::MODULUS) {
        return Err(TwinveilError::invalid_point(
            VIEW_CURVE_NAME,
            "coordinate is not below the field modulus",
        ));
    }
    Ok(Fq::from(value))
}

fn field_to_be_bytes<F: PrimeField>(value: &F) -> [u8; SCALAR_SIZE] {
    let bytes = value.into_bigint().to_bytes_be();
    let mut out = [0u8; SCALAR_SIZE];
    out[SCALAR_SIZE - bytes.len()..].copy_from_slice(&bytes);
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCALARS
// ═══════════════════════════════════════════════════════════════════════════════

/// A secret scalar modulo the BN254 group order.
///
/// Zeroized on drop; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ViewScalar(Fr);

impl ViewScalar {
    /// Draws a uniform scalar from a cryptographically secure source.
    ///
    /// # Errors
    /// Returns `CryptoFailure` if the source fails.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let mut wide = wide_random_bytes(rng)?;
        let scalar = Fr::from_be_bytes_mod_order(&wide);
        wide.zeroize();

        if scalar.is_zero() {
            return Err(TwinveilError::CryptoFailure("sampled zero view scalar".into()));
        }
        Ok(Self(scalar))
    }

    /// Returns the 32-byte big-endian encoding.
    pub fn to_be_bytes(&self) -> [u8; SCALAR_SIZE] {
        field_to_be_bytes(&self.0)
    }

    /// Renders the scalar in decimal, the form used for transient ephemeral keys.
    pub fn to_decimal(&self) -> String {
        let value: BigUint = self.0.into();
        value.to_str_radix(10)
    }
}

impl SecretScalar for ViewScalar {
    const CURVE_NAME: &'static str = VIEW_CURVE_NAME;

    fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = decode_scalar_hex(s)?;
        let value = BigUint::from_bytes_be(&bytes);
        bytes.zeroize();

        if value >= BigUint::from(Fr::MODULUS) {
            return Err(TwinveilError::InvalidEncoding(format!(
                "{} scalar is not below the group order",
                VIEW_CURVE_NAME
            )));
        }
        let scalar = Fr::from(value);
        if scalar.is_zero() {
            return Err(TwinveilError::InvalidEncoding(format!("{} scalar is zero", VIEW_CURVE_NAME)));
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

impl Zeroize for ViewScalar {
    fn zeroize(&mut self) {
        self.0 = Fr::zero();
    }
}

impl Drop for ViewScalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for ViewScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewScalar([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use twinveil_core::codec::{is_valid_point, parse_point};

    // BN254 field modulus p
    const P: &str = "21888242871839275222246405745257275088696311157297823662689037894645226208583";

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(11)
    }

    #[test]
    fn test_generator_is_one_two() {
        let one = ViewScalar::from_hex("1").unwrap();
        let g = ViewPoint::mul_base(&one);
        assert_eq!(g.to_decimal_coordinates().unwrap(), ("1".to_string(), "2".to_string()));
        assert!(is_valid_point::<ViewPoint>("1.2"));
    }

    #[test]
    fn test_off_curve_point_is_invalid() {
        assert!(!is_valid_point::<ViewPoint>("1.3"));
        let err = parse_point::<ViewPoint>("1.3").unwrap_err();
        assert!(matches!(err, TwinveilError::InvalidPoint { .. }));
    }

    #[test]
    fn test_non_canonical_coordinate_is_invalid() {
        // 1 + p is congruent to the generator's x but is not canonical
        let x = (BigUint::parse_bytes(P.as_bytes(), 10).unwrap() + 1u32).to_str_radix(10);
        assert!(!is_valid_point::<ViewPoint>(&format!("{}.2", x)));
    }

    #[test]
    fn test_letters_are_invalid_without_panicking() {
        assert!(!is_valid_point::<ViewPoint>("abc.def"));
        assert!(!is_valid_point::<ViewPoint>("test1.22"));
    }

    #[test]
    fn test_random_public_key_is_valid() {
        let v = ViewScalar::random(&mut rng()).unwrap();
        let public = ViewPoint::mul_base(&v);
        let packed = public.pack().unwrap();
        assert!(is_valid_point::<ViewPoint>(packed.as_str()));
        assert_eq!(ViewPoint::unpack(&packed).unwrap(), public);
    }

    #[test]
    fn test_scalar_hex_roundtrip() {
        let v = ViewScalar::random(&mut rng()).unwrap();
        assert_eq!(ViewScalar::from_hex(&v.to_hex()).unwrap(), v);
    }

    #[test]
    fn test_scalar_rejects_order_and_zero() {
        // group order r
        let r = "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001";
        assert!(ViewScalar::from_hex(r).is_err());
        assert!(ViewScalar::from_hex("00").is_err());
    }

    #[test]
    fn test_scalar_decimal() {
        let v = ViewScalar::from_hex("ff").unwrap();
        assert_eq!(v.to_decimal(), "255");
    }

    #[test]
    fn test_diffie_hellman_commutes() {
        let mut rng = rng();
        let a = ViewScalar::random(&mut rng).unwrap();
        let b = ViewScalar::random(&mut rng).unwrap();
        let lhs = ViewPoint::mul_base(&a).mul(&b);
        let rhs = ViewPoint::mul_base(&b).mul(&a);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_leading_zeros_are_accepted() {
        assert!(is_valid_point::<ViewPoint>("001.02"));
        let g = parse_point::<ViewPoint>("001.02").unwrap();
        assert_eq!(g.pack().unwrap().as_str(), "1.2");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_perturbed_coordinate_is_invalid(seed in any::<u64>()) {
            let v = ViewScalar::random(&mut ChaCha20Rng::seed_from_u64(seed)).unwrap();
            let (x, y) = ViewPoint::mul_base(&v).to_decimal_coordinates().unwrap();
            let packed = format!("{}.{}", x, y);
            prop_assert!(is_valid_point::<ViewPoint>(&packed));

            let y_plus = (BigUint::parse_bytes(y.as_bytes(), 10).unwrap() + 1u32).to_str_radix(10);
            let perturbed = format!("{}.{}", x, y_plus);
            prop_assert!(!is_valid_point::<ViewPoint>(&perturbed));
        }
    }
}
