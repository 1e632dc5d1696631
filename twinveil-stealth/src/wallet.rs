//! Twinveil wallet and meta-address management.
//!
//! The wallet holds a recipient's secret key pair and the meta-address derived
//! from it, and provides high-level operations for receiving payments.

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use twinveil_core::error::Result;
use twinveil_core::traits::{CurvePoint, SecretScalar};
use twinveil_core::types::{MetaAddress, ScanCandidate, SendPayload};
use twinveil_crypto::{SpendPoint, SpendScalar, ViewPoint, ViewScalar, ViewTagScheme};

use crate::discovery::{scan_candidate, verify_payload_ownership, CandidateOutcome};

// ═══════════════════════════════════════════════════════════════════════════════
// VIEWING KEY PAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// A recipient's full secret: spending scalar `k` and viewing scalar `v`.
///
/// Never mutated after creation. Both scalars are zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ViewingKeyPair {
    spending_sk: SpendScalar,
    viewing_sk: ViewScalar,
}

impl ViewingKeyPair {
    /// Pairs existing secrets.
    pub fn new(spending_sk: SpendScalar, viewing_sk: ViewScalar) -> Self {
        Self {
            spending_sk,
            viewing_sk,
        }
    }

    /// Draws both secrets from the operating system's secure source.
    pub fn generate() -> Result<Self> {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Draws `k` and `v` independently from `rng`.
    ///
    /// # Errors
    /// Returns `CryptoFailure` only if the source fails.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let spending_sk = SpendScalar::random(rng)?;
        let viewing_sk = ViewScalar::random(rng)?;
        Ok(Self::new(spending_sk, viewing_sk))
    }

    /// Parses hex-encoded secrets.
    ///
    /// # Errors
    /// Returns `InvalidEncoding` for either malformed secret.
    pub fn from_hex(spending_sk: &str, viewing_sk: &str) -> Result<Self> {
        Ok(Self::new(
            SpendScalar::from_hex(spending_sk)?,
            ViewScalar::from_hex(viewing_sk)?,
        ))
    }

    /// Returns the spending scalar `k`.
    pub fn spending_secret(&self) -> &SpendScalar {
        &self.spending_sk
    }

    /// Returns the viewing scalar `v`.
    pub fn viewing_secret(&self) -> &ViewScalar {
        &self.viewing_sk
    }

    /// Computes K = k·G on the spend curve.
    pub fn spending_public_key(&self) -> SpendPoint {
        SpendPoint::mul_base(&self.spending_sk)
    }

    /// Computes V = v·G on the view curve.
    pub fn viewing_public_key(&self) -> ViewPoint {
        ViewPoint::mul_base(&self.viewing_sk)
    }

    /// Exports both secrets as zero-padded hex.
    pub fn export(&self) -> ExportedSecrets {
        ExportedSecrets {
            spending_sk: self.spending_sk.to_hex(),
            viewing_sk: self.viewing_sk.to_hex(),
        }
    }
}

impl fmt::Debug for ViewingKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewingKeyPair")
            .field("spending_sk", &"[REDACTED]")
            .field("viewing_sk", &"[REDACTED]")
            .finish()
    }
}

/// Hex-encoded secrets for backup. Zeroized on drop.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ExportedSecrets {
    /// Spending secret `k` (64 hex digits)
    #[serde(rename = "k")]
    pub spending_sk: String,
    /// Viewing secret `v` (64 hex digits)
    #[serde(rename = "v")]
    pub viewing_sk: String,
}

impl fmt::Debug for ExportedSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExportedSecrets([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS MANAGEMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Generates a fresh key pair and its meta-address.
///
/// # Errors
/// Returns `CryptoFailure` only if the secure source fails.
pub fn generate_meta_address() -> Result<(ViewingKeyPair, MetaAddress)> {
    let keys = ViewingKeyPair::generate()?;
    let meta_address = recompute_meta_address(&keys)?;
    Ok((keys, meta_address))
}

/// Recomputes K and V from the supplied secrets. Draws no randomness.
pub fn recompute_meta_address(keys: &ViewingKeyPair) -> Result<MetaAddress> {
    Ok(MetaAddress::new(
        keys.spending_public_key().pack()?,
        keys.viewing_public_key().pack()?,
    ))
}

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for wallet operations.
#[derive(Clone, Debug, Default)]
pub struct WalletConfig {
    /// View tag scheme expected on incoming payments
    pub view_tag_scheme: ViewTagScheme,
}

/// A Twinveil wallet containing keys for receiving private payments.
///
/// The wallet holds:
/// - Spending secret: for deriving one-time spending private keys
/// - Viewing secret: for recognizing payments (can be shared with auditors)
pub struct TwinveilWallet {
    keys: ViewingKeyPair,
    meta_address: MetaAddress,
    config: WalletConfig,
}

impl TwinveilWallet {
    /// Generates a new wallet with random keys.
    pub fn generate() -> Result<Self> {
        Self::generate_with_config(WalletConfig::default())
    }

    /// Generates a new wallet with custom configuration.
    pub fn generate_with_config(config: WalletConfig) -> Result<Self> {
        let mut wallet = Self::from_keys(ViewingKeyPair::generate()?)?;
        wallet.config = config;
        Ok(wallet)
    }

    /// Creates a wallet from existing keys.
    pub fn from_keys(keys: ViewingKeyPair) -> Result<Self> {
        let meta_address = recompute_meta_address(&keys)?;
        Ok(Self {
            keys,
            meta_address,
            config: WalletConfig::default(),
        })
    }

    /// Restores a wallet from hex-encoded secrets.
    pub fn from_secrets(spending_sk: &str, viewing_sk: &str) -> Result<Self> {
        Self::from_keys(ViewingKeyPair::from_hex(spending_sk, viewing_sk)?)
    }

    /// Returns the meta-address for publishing.
    pub fn meta_address(&self) -> &MetaAddress {
        &self.meta_address
    }

    /// Returns the key pair.
    pub fn keys(&self) -> &ViewingKeyPair {
        &self.keys
    }

    /// Returns the wallet configuration.
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Checks one candidate against this wallet.
    pub fn try_discover(&self, candidate: &ScanCandidate) -> CandidateOutcome {
        scan_candidate(candidate, &self.keys, self.config.view_tag_scheme)
    }

    /// Checks that a full payload was built for this wallet, including its
    /// declared one-time public key.
    pub fn owns_payload(&self, payload: &SendPayload) -> Result<bool> {
        verify_payload_ownership(payload, &self.keys, self.config.view_tag_scheme)
    }

    /// Exports the secrets for backup.
    pub fn export_secrets(&self) -> ExportedSecrets {
        self.keys.export()
    }
}

impl fmt::Debug for TwinveilWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwinveilWallet")
            .field("meta_address", &self.meta_address)
            .field("config", &self.config)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}
