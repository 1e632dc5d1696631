//! # Twinveil Core
//!
//! Core types, errors, and traits for the Twinveil dual-curve stealth address protocol.
//!
//! This crate provides the foundational building blocks used by all other Twinveil crates:
//!
//! - **Types**: Wire-level models for packed points, meta-addresses, payloads and scan results
//! - **Codec**: The `"<x>.<y>"` point packing used on every boundary
//! - **Errors**: The protocol error taxonomy
//! - **Constants**: Protocol constants and sizes
//! - **Traits**: The curve capability the codec and engines are written against
//!
//! ## Example
//!
//! ```rust
//! use twinveil_core::{codec, PackedPoint};
//!
//! let packed = PackedPoint::from_coordinates("1", "2");
//! assert_eq!(packed.as_str(), "1.2");
//! assert_eq!(codec::decode_point(packed.as_str()).unwrap(), ("1", "2"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod codec;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, TwinveilError};
pub use traits::*;
pub use types::*;
