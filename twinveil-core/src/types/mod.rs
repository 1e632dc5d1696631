//! Wire-level domain types for Twinveil.
//!
//! - [`PackedPoint`]: A curve point in `"<x>.<y>"` form, unvalidated until unpacked
//! - [`ViewTag`]: Short hex pre-filter published alongside each payment
//! - [`MetaAddress`]: Recipient's long-term public identifier (K, V)
//! - [`SendPayload`]: Output of one send operation
//! - [`ScanCandidate`]: One observed payment handed to the scanner
//! - [`ScanResult`]: Spending key material for a matched candidate

mod point;
mod view_tag;
mod address;
mod payment;

pub use point::*;
pub use view_tag::*;
pub use address::*;
pub use payment::*;
