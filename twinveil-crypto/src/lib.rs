//! # Twinveil Cryptography
//!
//! Curve arithmetic and the pairing step of the Twinveil protocol.
//!
//! This crate provides:
//!
//! - **Spend curve**: secp256k1 points and scalars via `k256`
//! - **View curve**: BN254 G1 points and scalars via arkworks
//! - **Shared secret**: the pairing `e(shared, G2)` and the blinding scalar `b`
//! - **View tags**: versioned pre-filters computed from the shared point
//! - **Randomness**: secure scalar sampling that reports source failures
//!
//! ## Security Properties
//!
//! - Secret scalars are zeroized on drop and never printed
//! - Sender and recipient derive `b` through the same function
//! - View tags are compared in constant time
//!
//! ## Example
//!
//! ```rust
//! use rand::rngs::OsRng;
//! use twinveil_crypto::{blinding_scalar, ViewPoint, ViewScalar};
//!
//! let v = ViewScalar::random(&mut OsRng).unwrap();
//! let r = ViewScalar::random(&mut OsRng).unwrap();
//!
//! let sender = blinding_scalar(&ViewPoint::mul_base(&v).mul(&r)).unwrap();
//! let recipient = blinding_scalar(&ViewPoint::mul_base(&r).mul(&v)).unwrap();
//! assert_eq!(sender, recipient);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod random;
pub mod shared_secret;
pub mod spend;
pub mod view;
pub mod view_tag;

// Re-export main types at crate root
pub use shared_secret::{blinding_scalar, SharedSecret};
pub use spend::{SpendPoint, SpendScalar};
pub use view::{ViewPoint, ViewScalar};
pub use view_tag::ViewTagScheme;
