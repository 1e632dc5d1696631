//! Decoy payments for benchmarks and tests.
//!
//! Decoys are genuine payloads addressed to throwaway recipients, so their R
//! is valid and their tag is self-consistent. A scanner treats them exactly
//! like foreign traffic.

use rand::{CryptoRng, RngCore};

use twinveil_core::error::Result;
use twinveil_core::types::{ScanCandidate, SendPayload};
use twinveil_crypto::ViewTagScheme;

use crate::payment::SendPayloadBuilder;
use crate::wallet::{recompute_meta_address, ViewingKeyPair};

/// Generates `count` payloads, each to a fresh random recipient.
pub fn random_payloads<R: RngCore + CryptoRng>(
    count: usize,
    scheme: ViewTagScheme,
    rng: &mut R,
) -> Result<Vec<SendPayload>> {
    (0..count)
        .map(|_| {
            let keys = ViewingKeyPair::generate_with_rng(rng)?;
            SendPayloadBuilder::new()
                .recipient(recompute_meta_address(&keys)?)
                .view_tag_scheme(scheme)
                .build_with_rng(rng)
        })
        .collect()
}

/// Generates `count` unrelated scan candidates.
pub fn random_candidates<R: RngCore + CryptoRng>(
    count: usize,
    scheme: ViewTagScheme,
    rng: &mut R,
) -> Result<Vec<ScanCandidate>> {
    Ok(random_payloads(count, scheme, rng)?
        .iter()
        .map(SendPayload::to_candidate)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use twinveil_core::codec::is_valid_point;
    use twinveil_crypto::ViewPoint;

    #[test]
    fn test_random_candidates_are_valid() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let candidates = random_candidates(5, ViewTagScheme::default(), &mut rng).unwrap();
        assert_eq!(candidates.len(), 5);
        for candidate in &candidates {
            assert!(is_valid_point::<ViewPoint>(candidate.ephemeral_key.as_str()));
            assert!(!candidate.view_tag.is_empty());
        }
    }

    #[test]
    fn test_random_candidates_are_distinct() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let candidates = random_candidates(3, ViewTagScheme::default(), &mut rng).unwrap();
        assert_ne!(candidates[0].ephemeral_key, candidates[1].ephemeral_key);
        assert_ne!(candidates[1].ephemeral_key, candidates[2].ephemeral_key);
    }

    #[test]
    fn test_zero_decoys() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        assert!(random_payloads(0, ViewTagScheme::Disabled, &mut rng).unwrap().is_empty());
    }
}
