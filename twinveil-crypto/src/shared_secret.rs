//! Pairing-based shared secret and the blinding scalar derived from it.
//!
//! Sender and recipient agree on a shared view-curve point (`r·V` = `v·R`).
//! Pairing it with the fixed G2 generator lifts it into the target group, and
//! one base-field coefficient of the result becomes the spend-curve scalar
//! `b` that blinds the recipient's spending key.
//!
//! Both engines call [`blinding_scalar`] so they can never disagree on how
//! `b` is produced.

use ark_bn254::{Bn254, Fq, Fq12, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, One, PrimeField};
use zeroize::Zeroize;

use twinveil_core::constants::SCALAR_SIZE;
use twinveil_core::error::{Result, TwinveilError};

use crate::spend::SpendScalar;
use crate::view::ViewPoint;

/// Target group element `e(shared, G2)`.
///
/// Only the coefficient used for blinding is ever read out.
pub struct SharedSecret(Fq12);

impl SharedSecret {
    /// Evaluates the optimal ate pairing of `shared` with the G2 generator.
    ///
    /// # Errors
    /// Returns `CryptoFailure` for the identity or a degenerate pairing output.
    pub fn from_shared_point(shared: &ViewPoint) -> Result<Self> {
        if shared.is_identity() {
            return Err(TwinveilError::CryptoFailure(
                "shared point is the identity".into(),
            ));
        }

        let gt = Bn254::pairing(*shared.as_affine(), G2Affine::generator());
        if gt.0.is_one() {
            return Err(TwinveilError::CryptoFailure("degenerate pairing output".into()));
        }
        Ok(Self(gt.0))
    }

    /// The lowest base-field coefficient of the target group element.
    fn blinding_coefficient(&self) -> Fq {
        self.0.c0.c0.c0
    }

    /// Reduces the blinding coefficient modulo the spend-curve order.
    pub fn to_blinding_scalar(&self) -> Result<SpendScalar> {
        let mut bytes = self.blinding_coefficient().into_bigint().to_bytes_be();
        if bytes.len() > SCALAR_SIZE {
            bytes.zeroize();
            return Err(TwinveilError::InternalError(
                "base-field element wider than a scalar".into(),
            ));
        }

        let mut padded = [0u8; SCALAR_SIZE];
        padded[SCALAR_SIZE - bytes.len()..].copy_from_slice(&bytes);
        bytes.zeroize();

        let scalar = SpendScalar::reduce_be_bytes(&padded);
        padded.zeroize();

        if scalar.is_zero() {
            return Err(TwinveilError::CryptoFailure("blinding scalar is zero".into()));
        }
        Ok(scalar)
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0 = Fq12::one();
    }
}

/// Derives the blinding scalar `b` from the shared view-curve point.
///
/// # Errors
/// Returns `CryptoFailure` if the pairing degenerates or `b` reduces to zero.
pub fn blinding_scalar(shared: &ViewPoint) -> Result<SpendScalar> {
    SharedSecret::from_shared_point(shared)?.to_blinding_scalar()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spend::SpendPoint;
    use crate::view::ViewScalar;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use twinveil_core::traits::SecretScalar;

    #[test]
    fn test_both_sides_derive_the_same_scalar() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let v = ViewScalar::random(&mut rng).unwrap();
        let r = ViewScalar::random(&mut rng).unwrap();
        let viewing_pk = ViewPoint::mul_base(&v);
        let ephemeral_pk = ViewPoint::mul_base(&r);

        let sender = blinding_scalar(&viewing_pk.mul(&r)).unwrap();
        let recipient = blinding_scalar(&ephemeral_pk.mul(&v)).unwrap();
        assert_eq!(sender, recipient);
    }

    #[test]
    fn test_different_shared_points_give_different_scalars() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let a = ViewPoint::mul_base(&ViewScalar::random(&mut rng).unwrap());
        let b = ViewPoint::mul_base(&ViewScalar::random(&mut rng).unwrap());
        assert_ne!(blinding_scalar(&a).unwrap(), blinding_scalar(&b).unwrap());
    }

    #[test]
    fn test_blinded_key_matches_blinded_secret() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let k = SpendScalar::random(&mut rng).unwrap();
        let shared = ViewPoint::mul_base(&ViewScalar::random(&mut rng).unwrap());
        let b = blinding_scalar(&shared).unwrap();

        let from_public = SpendPoint::mul_base(&k).mul(&b);
        let from_secret = SpendPoint::mul_base(&k.mul(&b));
        assert_eq!(from_public, from_secret);
    }

    #[test]
    fn test_generator_pairing_is_not_degenerate() {
        let one = ViewScalar::from_hex("1").unwrap();
        assert!(SharedSecret::from_shared_point(&ViewPoint::mul_base(&one)).is_ok());
    }
}
