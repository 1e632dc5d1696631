//! Secure scalar sampling.
//!
//! Scalars are drawn as 512 uniform bits and reduced modulo the group order,
//! which leaves a bias below 2^-250 for both curves.

use rand::{CryptoRng, RngCore};

use twinveil_core::error::{Result, TwinveilError};

/// Number of random bytes drawn per scalar.
pub const WIDE_BYTES: usize = 64;

/// Fills 64 bytes from a cryptographically secure source.
///
/// # Errors
/// Returns `CryptoFailure` if the source reports an error.
pub fn wide_random_bytes<R: RngCore + CryptoRng>(rng: &mut R) -> Result<[u8; WIDE_BYTES]> {
    let mut out = [0u8; WIDE_BYTES];
    rng.try_fill_bytes(&mut out)
        .map_err(|e| TwinveilError::CryptoFailure(format!("secure random source failed: {}", e)))?;
    Ok(out)
}
