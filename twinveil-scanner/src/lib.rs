//! # Twinveil Scanner
//!
//! Batch scanning of candidate payments to discover the ones addressed to a
//! recipient.
//!
//! ## Features
//!
//! - **Batch Processing**: Scans candidates in configurable batches
//! - **Progress Reporting**: Callbacks for UI progress updates
//! - **Parallel Scanning**: Optional data-parallel evaluation with rayon
//! - **Stable Order**: Matches come back in input order, parallel or not
//!
//! Candidates have no data dependency on each other, so every batch can be
//! evaluated in parallel. Results are collected by original index, which
//! makes a parallel scan indistinguishable from a sequential one.
//!
//! ## Example
//!
//! ```rust
//! use twinveil_scanner::{Scanner, ScannerConfig};
//! use twinveil_stealth::{create_send_payload, TwinveilWallet};
//!
//! let wallet = TwinveilWallet::generate().unwrap();
//! let payload = create_send_payload(wallet.meta_address()).unwrap();
//!
//! let scanner = Scanner::from_wallet(&wallet, ScannerConfig::new());
//! let found = scanner.scan(&[payload.to_candidate()]);
//! assert_eq!(found.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

use std::time::Instant;

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use twinveil_core::constants::{DEFAULT_PARALLEL_THRESHOLD, DEFAULT_SCAN_BATCH_SIZE};
use twinveil_core::types::{ScanCandidate, ScanResult};
use twinveil_crypto::ViewTagScheme;
use twinveil_stealth::discovery::{log_skip, scan_candidate, CandidateOutcome, DiscoveryResult, ScanStats};
use twinveil_stealth::{TwinveilWallet, ViewingKeyPair};

/// Scanner configuration.
#[derive(Clone, Debug)]
pub struct ScannerConfig {
    /// View tag scheme the candidates were built with
    pub view_tag_scheme: ViewTagScheme,
    /// Whether to evaluate batches in parallel
    pub parallel: bool,
    /// Batches smaller than this run sequentially
    pub parallel_threshold: usize,
    /// Candidates per batch (and per progress report)
    pub batch_size: usize,
    /// Whether to stop on first discovery
    pub stop_on_first: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            view_tag_scheme: ViewTagScheme::default(),
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            batch_size: DEFAULT_SCAN_BATCH_SIZE,
            stop_on_first: false,
        }
    }
}

impl ScannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the view tag scheme.
    pub fn view_tag_scheme(mut self, scheme: ViewTagScheme) -> Self {
        self.view_tag_scheme = scheme;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the minimum batch length for parallel evaluation.
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the batch size. Zero is treated as one.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Enables stopping on first discovery.
    pub fn stop_on_first(mut self) -> Self {
        self.stop_on_first = true;
        self
    }
}

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(ScanProgress) + Send + Sync>;

/// Scan progress information.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Total candidates to scan
    pub total: u64,
    /// Candidates scanned so far
    pub scanned: u64,
    /// Discoveries found so far
    pub discoveries: u64,
    /// Current scan rate (candidates per second)
    pub rate: f64,
    /// Estimated time remaining in seconds
    pub eta_seconds: Option<f64>,
    /// Percentage complete (0-100)
    pub percent: f64,
}

impl ScanProgress {
    /// Creates a new progress tracker.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            scanned: 0,
            discoveries: 0,
            rate: 0.0,
            eta_seconds: None,
            percent: 0.0,
        }
    }

    /// Updates progress with new values.
    pub fn update(&mut self, scanned: u64, discoveries: u64, elapsed_ms: u64) {
        self.scanned = scanned;
        self.discoveries = discoveries;

        if elapsed_ms > 0 {
            self.rate = (scanned as f64 / elapsed_ms as f64) * 1000.0;
        }

        if self.total > 0 {
            self.percent = (scanned as f64 / self.total as f64) * 100.0;

            if self.rate > 0.0 {
                let remaining = self.total.saturating_sub(scanned);
                self.eta_seconds = Some(remaining as f64 / self.rate);
            }
        } else {
            self.percent = 100.0;
        }
    }
}

/// Main scanner for discovering payments.
///
/// Holds the recipient's keys and accumulates statistics across calls. The
/// matches returned by a call depend only on its inputs.
pub struct Scanner {
    keys: ViewingKeyPair,
    config: ScannerConfig,
    stats: RwLock<ScanStats>,
}

impl Scanner {
    /// Creates a new scanner with the given keys.
    pub fn new(keys: ViewingKeyPair, config: ScannerConfig) -> Self {
        Self {
            keys,
            config,
            stats: RwLock::new(ScanStats::new()),
        }
    }

    /// Creates a scanner from a wallet, using the wallet's view tag scheme.
    pub fn from_wallet(wallet: &TwinveilWallet, config: ScannerConfig) -> Self {
        let config = config.view_tag_scheme(wallet.config().view_tag_scheme);
        Self::new(wallet.keys().clone(), config)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Returns the accumulated statistics.
    pub fn stats(&self) -> ScanStats {
        self.stats.read().clone()
    }

    /// Resets the accumulated statistics.
    pub fn reset_stats(&self) {
        *self.stats.write() = ScanStats::new();
    }

    /// Scans candidates, returning matches in input order.
    pub fn scan(&self, candidates: &[ScanCandidate]) -> Vec<ScanResult> {
        self.scan_with_context(candidates)
            .into_iter()
            .map(|found| found.result)
            .collect()
    }

    /// Scans candidates, returning matches with their input indices.
    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    pub fn scan_with_context(&self, candidates: &[ScanCandidate]) -> Vec<DiscoveryResult> {
        self.run(candidates, |_| {})
    }

    /// Scans with a progress report after every batch.
    #[instrument(skip(self, candidates, progress_callback), fields(count = candidates.len()))]
    pub fn scan_with_progress(
        &self,
        candidates: &[ScanCandidate],
        progress_callback: ProgressCallback,
    ) -> Vec<ScanResult> {
        self.run(candidates, |progress| progress_callback(progress))
            .into_iter()
            .map(|found| found.result)
            .collect()
    }

    /// Scans a single candidate.
    pub fn scan_one(&self, candidate: &ScanCandidate) -> CandidateOutcome {
        let outcome = scan_candidate(candidate, &self.keys, self.config.view_tag_scheme);
        self.stats.write().record(&outcome);
        outcome
    }

    fn run<F>(&self, candidates: &[ScanCandidate], on_progress: F) -> Vec<DiscoveryResult>
    where
        F: Fn(ScanProgress),
    {
        let start = Instant::now();
        let mut stats = ScanStats::new();
        let mut discoveries = Vec::new();
        let mut progress = ScanProgress::new(candidates.len() as u64);
        let batch_size = self.config.batch_size.max(1);

        for (batch_index, batch) in candidates.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;
            let outcomes = self.evaluate_batch(batch);

            for (i, outcome) in outcomes.into_iter().enumerate() {
                let index = offset + i;
                stats.record(&outcome);
                log_skip(index, &outcome);
                if let Some(result) = outcome.into_result() {
                    discoveries.push(DiscoveryResult { index, result });
                    if self.config.stop_on_first {
                        break;
                    }
                }
            }

            progress.update(
                stats.total_scanned,
                discoveries.len() as u64,
                start.elapsed().as_millis() as u64,
            );
            on_progress(progress.clone());

            if self.config.stop_on_first && !discoveries.is_empty() {
                info!("Stopping on first discovery");
                break;
            }
        }

        if candidates.is_empty() {
            progress.update(0, 0, 0);
            on_progress(progress);
        }

        stats.duration = start.elapsed();
        info!(
            discoveries = stats.discoveries,
            scanned = stats.total_scanned,
            invalid = stats.invalid,
            duration_ms = stats.duration.as_millis() as u64,
            rate = format!("{:.2}/s", stats.rate()),
            "Scan complete"
        );
        self.stats.write().merge(&stats);

        discoveries
    }

    /// Evaluates one batch; the output is aligned with the input.
    fn evaluate_batch(&self, batch: &[ScanCandidate]) -> Vec<CandidateOutcome> {
        let scheme = self.config.view_tag_scheme;
        if self.config.parallel && batch.len() >= self.config.parallel_threshold {
            batch
                .par_iter()
                .map(|candidate| scan_candidate(candidate, &self.keys, scheme))
                .collect()
        } else {
            batch
                .iter()
                .map(|candidate| scan_candidate(candidate, &self.keys, scheme))
                .collect()
        }
    }
}

/// Scans candidates with the given keys in one call.
///
/// Returns the matches in input order together with this call's statistics.
pub fn scan_batch(
    keys: &ViewingKeyPair,
    candidates: &[ScanCandidate],
    config: ScannerConfig,
) -> (Vec<ScanResult>, ScanStats) {
    let scanner = Scanner::new(keys.clone(), config);
    let results = scanner.scan(candidates);
    (results, scanner.stats())
}

/// Scan result summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of candidates scanned
    pub total_scanned: u64,
    /// Number of candidates skipped as invalid
    pub invalid: u64,
    /// Number of view tag matches
    pub view_tag_matches: u64,
    /// Number of payments discovered
    pub discoveries: u64,
    /// Number of errors
    pub errors: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Scan rate (candidates per second)
    pub rate: f64,
    /// Filter efficiency (% of valid candidates filtered by view tag)
    pub filter_efficiency: f64,
}

impl From<ScanStats> for ScanSummary {
    fn from(stats: ScanStats) -> Self {
        Self {
            total_scanned: stats.total_scanned,
            invalid: stats.invalid,
            view_tag_matches: stats.view_tag_matches,
            discoveries: stats.discoveries,
            errors: stats.errors,
            duration_ms: stats.duration.as_millis() as u64,
            rate: stats.rate(),
            filter_efficiency: stats.filter_efficiency(),
        }
    }
}
