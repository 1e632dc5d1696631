//! # Twinveil Stealth Address Protocol
//!
//! High-level API for creating and discovering stealth payments.
//!
//! This crate provides:
//!
//! - **Key Generation**: Create Twinveil key pairs (spending `k` + viewing `v`)
//! - **Meta-Address Management**: Build or recompute publishable meta-addresses
//! - **Send Payloads**: Generate one-time spending keys for payments
//! - **Payment Discovery**: Scan candidates to find incoming payments
//! - **Decoys**: Unrelated but well-formed candidates for benchmarks
//!
//! ## Quick Start
//!
//! ```rust
//! use twinveil_stealth::{create_send_payload, TwinveilWallet};
//!
//! // Recipient: generate keys and publish the meta-address
//! let wallet = TwinveilWallet::generate().unwrap();
//! let meta_address = wallet.meta_address();
//!
//! // Sender: create a payload; fund spendingPubKey, publish R and viewTag
//! let payload = create_send_payload(meta_address).unwrap();
//!
//! // Recipient: discover the payment and its one-time private key
//! let found = wallet.try_discover(&payload.to_candidate()).into_result().unwrap();
//! assert_eq!(found.spending_pk, payload.spending_pk);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod decoy;
pub mod discovery;
pub mod payment;
pub mod wallet;

pub use decoy::{random_candidates, random_payloads};
pub use discovery::{
    scan_candidate, scan_candidates, scan_with_context, verify_payload_ownership, CandidateOutcome,
    DiscoveryResult, ScanStats,
};
pub use payment::{
    create_send_payload, create_send_payload_with_ephemeral, send_payload_from_ephemeral,
    EphemeralSecret, SendPayloadBuilder,
};
pub use wallet::{
    generate_meta_address, recompute_meta_address, ExportedSecrets, TwinveilWallet, ViewingKeyPair,
    WalletConfig,
};
