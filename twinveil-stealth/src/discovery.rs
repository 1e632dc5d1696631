//! Payment discovery (recipient scan).
//!
//! Each candidate is evaluated on its own: parse R, compare the view tag
//! computed from v·R, and only on a tag hit evaluate the pairing and derive
//! the one-time spending key. A tag hit is trusted; the declared one-time
//! public key is not part of a candidate and is not re-checked here. Use
//! [`verify_payload_ownership`] when the full payload is available.

use std::time::Duration;

use tracing::debug;
use zeroize::Zeroize;

use twinveil_core::codec::parse_point;
use twinveil_core::error::{Result, TwinveilError};
use twinveil_core::traits::{CurvePoint, SecretScalar};
use twinveil_core::types::{ScanCandidate, ScanResult, SendPayload, SpendingPrivKey};
use twinveil_crypto::{blinding_scalar, SpendPoint, ViewPoint, ViewTagScheme};

use crate::wallet::ViewingKeyPair;

/// Outcome of scanning a single candidate.
#[derive(Debug)]
pub enum CandidateOutcome {
    /// R is not a valid view-curve point; the candidate is skipped
    Invalid(TwinveilError),
    /// View tag didn't match - not for this recipient
    NotForUs,
    /// View tag matched and the spending key was derived
    Discovered(ScanResult),
    /// View tag matched but derivation failed (negligible probability)
    DerivationFailed(TwinveilError),
}

impl CandidateOutcome {
    /// Returns true if a payment was discovered.
    pub fn is_discovered(&self) -> bool {
        matches!(self, CandidateOutcome::Discovered(_))
    }

    /// Returns the derived key material if present.
    pub fn into_result(self) -> Option<ScanResult> {
        match self {
            CandidateOutcome::Discovered(result) => Some(result),
            _ => None,
        }
    }
}

/// Statistics for scanning operations.
///
/// The only way to tell "nothing matched" apart from "inputs were malformed".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanStats {
    /// Total candidates scanned
    pub total_scanned: u64,
    /// Candidates skipped because R was invalid
    pub invalid: u64,
    /// Candidates whose view tag matched
    pub view_tag_matches: u64,
    /// Payments discovered
    pub discoveries: u64,
    /// Tag matches whose derivation failed
    pub errors: u64,
    /// Wall-clock duration of the scan
    pub duration: Duration,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a candidate outcome.
    pub fn record(&mut self, outcome: &CandidateOutcome) {
        self.total_scanned += 1;
        match outcome {
            CandidateOutcome::Invalid(_) => self.invalid += 1,
            CandidateOutcome::NotForUs => {}
            CandidateOutcome::Discovered(_) => {
                self.view_tag_matches += 1;
                self.discoveries += 1;
            }
            CandidateOutcome::DerivationFailed(_) => {
                self.view_tag_matches += 1;
                self.errors += 1;
            }
        }
    }

    /// Adds another batch's counters into this one.
    pub fn merge(&mut self, other: &ScanStats) {
        self.total_scanned += other.total_scanned;
        self.invalid += other.invalid;
        self.view_tag_matches += other.view_tag_matches;
        self.discoveries += other.discoveries;
        self.errors += other.errors;
        self.duration += other.duration;
    }

    /// Returns the scan rate (candidates per second).
    pub fn rate(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total_scanned as f64 / secs
        }
    }

    /// Returns the share of valid candidates rejected by the view tag, in percent.
    pub fn filter_efficiency(&self) -> f64 {
        let valid = self.total_scanned - self.invalid;
        if valid == 0 {
            0.0
        } else {
            ((valid - self.view_tag_matches) as f64 / valid as f64) * 100.0
        }
    }
}

/// Scans one candidate with the recipient's keys.
pub fn scan_candidate(
    candidate: &ScanCandidate,
    keys: &ViewingKeyPair,
    scheme: ViewTagScheme,
) -> CandidateOutcome {
    let ephemeral_pk = match parse_point::<ViewPoint>(candidate.ephemeral_key.as_str()) {
        Ok(point) => point,
        Err(e) => return CandidateOutcome::Invalid(e),
    };

    let shared = ephemeral_pk.mul(keys.viewing_secret());
    if !scheme.verify(&shared, &candidate.view_tag) {
        return CandidateOutcome::NotForUs;
    }

    match derive_scan_result(&shared, keys) {
        Ok(result) => CandidateOutcome::Discovered(result),
        Err(e) => CandidateOutcome::DerivationFailed(e),
    }
}

/// Derives `{k·b, (k·b)·G}` from the shared point v·R.
fn derive_scan_result(shared: &ViewPoint, keys: &ViewingKeyPair) -> Result<ScanResult> {
    let blinding = blinding_scalar(shared)?;
    let one_time_sk = keys.spending_secret().mul(&blinding);
    let one_time_pk = SpendPoint::mul_base(&one_time_sk);

    let mut digits = one_time_sk.to_hex();
    let spending_sk = SpendingPrivKey::from_hex_digits(&digits);
    digits.zeroize();

    Ok(ScanResult {
        spending_sk,
        spending_pk: one_time_pk.pack()?,
    })
}

/// A discovery together with the candidate's position in the input.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// Index of the candidate in the scanned sequence
    pub index: usize,
    /// Derived key material
    pub result: ScanResult,
}

/// Scans candidates in order, returning matches with their input indices.
pub fn scan_with_context(
    candidates: &[ScanCandidate],
    keys: &ViewingKeyPair,
    scheme: ViewTagScheme,
    stats: &mut ScanStats,
) -> Vec<DiscoveryResult> {
    candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let outcome = scan_candidate(candidate, keys, scheme);
            stats.record(&outcome);
            log_skip(index, &outcome);
            outcome
                .into_result()
                .map(|result| DiscoveryResult { index, result })
        })
        .collect()
}

/// Scans candidates in order, returning only the matches.
pub fn scan_candidates(
    candidates: &[ScanCandidate],
    keys: &ViewingKeyPair,
    scheme: ViewTagScheme,
) -> Vec<ScanResult> {
    let mut stats = ScanStats::new();
    scan_with_context(candidates, keys, scheme, &mut stats)
        .into_iter()
        .map(|found| found.result)
        .collect()
}

/// Emits a debug event for a skipped candidate. Never logs key material.
pub fn log_skip(index: usize, outcome: &CandidateOutcome) {
    match outcome {
        CandidateOutcome::Invalid(e) => debug!(index, reason = %e, "skipping invalid candidate"),
        CandidateOutcome::DerivationFailed(e) => {
            debug!(index, reason = %e, "view tag matched but derivation failed")
        }
        CandidateOutcome::NotForUs | CandidateOutcome::Discovered(_) => {}
    }
}

/// Checks a full payload against the recipient's keys, including the
/// declared one-time public key that a bare view tag match does not bind.
///
/// # Errors
/// Returns the point error if the payload's R is invalid.
pub fn verify_payload_ownership(
    payload: &SendPayload,
    keys: &ViewingKeyPair,
    scheme: ViewTagScheme,
) -> Result<bool> {
    let ephemeral_pk = parse_point::<ViewPoint>(payload.ephemeral_key.as_str())?;
    let shared = ephemeral_pk.mul(keys.viewing_secret());
    if !scheme.verify(&shared, &payload.view_tag) {
        return Ok(false);
    }

    let derived = derive_scan_result(&shared, keys)?;
    Ok(derived.spending_pk == payload.spending_pk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{create_send_payload, SendPayloadBuilder};
    use crate::wallet::{generate_meta_address, recompute_meta_address};
    use rand::SeedableRng;
    use proptest::prelude::*;
    use rand_chacha::ChaCha20Rng;
    use twinveil_core::types::{PackedPoint, ViewTag};
    use twinveil_crypto::SpendScalar;

    fn unmatchable(candidate: &ScanCandidate) -> ScanCandidate {
        ScanCandidate::new(candidate.ephemeral_key.clone(), ViewTag::new("zz"))
    }

    #[test]
    fn test_scan_candidate_discovery() {
        let (keys, meta) = generate_meta_address().unwrap();
        let payload = create_send_payload(&meta).unwrap();

        let outcome = scan_candidate(&payload.to_candidate(), &keys, ViewTagScheme::default());
        assert!(outcome.is_discovered());

        let result = outcome.into_result().unwrap();
        assert_eq!(result.spending_pk, payload.spending_pk);
        assert!(result.spending_sk.expose().starts_with("0x"));
        assert_eq!(result.spending_sk.hex_digits().len(), 64);

        // the private key reproduces the public key bit-for-bit
        let sk = SpendScalar::from_hex(result.spending_sk.expose()).unwrap();
        assert_eq!(SpendPoint::mul_base(&sk).pack().unwrap(), payload.spending_pk);
    }

    #[test]
    fn test_fixed_keys_scenario() {
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        let keys = ViewingKeyPair::generate_with_rng(&mut rng).unwrap();
        let meta = recompute_meta_address(&keys).unwrap();
        let payload = SendPayloadBuilder::new()
            .recipient(meta)
            .build_with_rng(&mut rng)
            .unwrap();

        let results = scan_candidates(&[payload.to_candidate()], &keys, ViewTagScheme::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].spending_pk, payload.spending_pk);
    }

    #[test]
    fn test_tag_mismatch_is_skipped() {
        let (keys, meta) = generate_meta_address().unwrap();
        let payload = create_send_payload(&meta).unwrap();

        let outcome = scan_candidate(&unmatchable(&payload.to_candidate()), &keys, ViewTagScheme::default());
        assert!(matches!(outcome, CandidateOutcome::NotForUs));
    }

    #[test]
    fn test_unrelated_keys_never_recover_the_payment() {
        let (_alice, meta) = generate_meta_address().unwrap();
        let (bob, _) = generate_meta_address().unwrap();
        let payload = create_send_payload(&meta).unwrap();

        // A tag collision is possible, a key collision is not.
        if let Some(result) = scan_candidate(&payload.to_candidate(), &bob, ViewTagScheme::default()).into_result() {
            assert_ne!(result.spending_pk, payload.spending_pk);
        }
        assert!(!verify_payload_ownership(&payload, &bob, ViewTagScheme::default()).unwrap());
    }

    #[test]
    fn test_unrelated_keys_rarely_match_with_hashed_tags() {
        let (_alice, meta) = generate_meta_address().unwrap();
        let (bob, _) = generate_meta_address().unwrap();
        let scheme = ViewTagScheme::Sha256 { len: 4 };

        let candidates: Vec<ScanCandidate> = (0..8)
            .map(|_| {
                SendPayloadBuilder::new()
                    .recipient(meta.clone())
                    .view_tag_scheme(scheme)
                    .build()
                    .unwrap()
                    .to_candidate()
            })
            .collect();
        assert!(scan_candidates(&candidates, &bob, scheme).is_empty());
    }

    #[test]
    fn test_invalid_candidate_is_skipped() {
        let (keys, _) = generate_meta_address().unwrap();
        for bad in ["abc.def", "1.3", "no-delimiter", ""] {
            let candidate = ScanCandidate::new(PackedPoint::new(bad), ViewTag::new("00"));
            let outcome = scan_candidate(&candidate, &keys, ViewTagScheme::default());
            assert!(matches!(outcome, CandidateOutcome::Invalid(_)), "{}", bad);
        }
    }

    #[test]
    fn test_scan_preserves_order_and_indices() {
        let (keys, meta) = generate_meta_address().unwrap();
        let first = create_send_payload(&meta).unwrap();
        let second = create_send_payload(&meta).unwrap();
        let junk = ScanCandidate::new(PackedPoint::new("abc.def"), ViewTag::new("00"));

        let candidates = vec![
            first.to_candidate(),
            junk.clone(),
            unmatchable(&first.to_candidate()),
            second.to_candidate(),
        ];
        let mut stats = ScanStats::new();
        let found = scan_with_context(&candidates, &keys, ViewTagScheme::default(), &mut stats);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].index, 0);
        assert_eq!(found[0].result.spending_pk, first.spending_pk);
        assert_eq!(found[1].index, 3);
        assert_eq!(found[1].result.spending_pk, second.spending_pk);

        assert_eq!(stats.total_scanned, 4);
        assert_eq!(stats.invalid, 1);
        assert_eq!(stats.discoveries, 2);
        assert_eq!(stats.view_tag_matches, 2);
    }

    #[test]
    fn test_adding_candidates_does_not_change_matches() {
        let (keys, meta) = generate_meta_address().unwrap();
        let (_other, other_meta) = generate_meta_address().unwrap();
        let mine = create_send_payload(&meta).unwrap();
        let theirs = create_send_payload(&other_meta).unwrap();

        let alone = scan_candidates(&[mine.to_candidate()], &keys, ViewTagScheme::default());
        let mixed = scan_candidates(
            &[theirs.to_candidate(), mine.to_candidate()],
            &keys,
            ViewTagScheme::default(),
        );
        assert_eq!(alone.len(), 1);
        assert!(mixed.iter().any(|r| r.spending_pk == alone[0].spending_pk));
    }

    #[test]
    fn test_empty_scan() {
        let (keys, _) = generate_meta_address().unwrap();
        assert!(scan_candidates(&[], &keys, ViewTagScheme::default()).is_empty());
    }

    #[test]
    fn test_longer_declared_tag_still_matches() {
        let (keys, meta) = generate_meta_address().unwrap();
        let payload = SendPayloadBuilder::new()
            .recipient(meta)
            .view_tag_scheme(ViewTagScheme::XCoordinate { len: 3 })
            .build()
            .unwrap();

        // recipient checks only one byte of a three-byte tag
        let outcome = scan_candidate(&payload.to_candidate(), &keys, ViewTagScheme::default());
        assert!(outcome.is_discovered());
    }

    #[test]
    fn test_stats_efficiency() {
        let mut stats = ScanStats::new();
        stats.record(&CandidateOutcome::NotForUs);
        stats.record(&CandidateOutcome::NotForUs);
        stats.record(&CandidateOutcome::NotForUs);
        stats.record(&CandidateOutcome::Invalid(TwinveilError::InvalidEncoding("x".into())));
        assert_eq!(stats.filter_efficiency(), 100.0);
        assert_eq!(stats.rate(), 0.0);

        let mut total = ScanStats::new();
        total.merge(&stats);
        total.merge(&stats);
        assert_eq!(total.total_scanned, 8);
        assert_eq!(total.invalid, 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_send_then_scan_recovers_spending_key(seed in any::<u64>()) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let keys = ViewingKeyPair::generate_with_rng(&mut rng).unwrap();
            let meta = recompute_meta_address(&keys).unwrap();
            let payload = SendPayloadBuilder::new()
                .recipient(meta)
                .build_with_rng(&mut rng)
                .unwrap();

            let results = scan_candidates(&[payload.to_candidate()], &keys, ViewTagScheme::default());
            prop_assert_eq!(results.len(), 1);
            let sk = SpendScalar::from_hex(results[0].spending_sk.expose()).unwrap();
            prop_assert_eq!(SpendPoint::mul_base(&sk).pack().unwrap(), payload.spending_pk.clone());
            prop_assert_eq!(&results[0].spending_pk, &payload.spending_pk);
        }
    }
}
