//! Protocol constants for Twinveil.
//!
//! Sizes follow the two curves in use: secp256k1 for spending keys and
//! BN254 (G1 + pairing) for viewing keys. Both have 256-bit scalar fields.

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Delimiter between the decimal x and y coordinates of a packed point.
/// Never appears in a decimal digit string.
pub const POINT_DELIMITER: char = '.';

/// Prefix attached to derived spending private keys in scan output.
pub const SPENDING_KEY_PREFIX: &str = "0x";

/// Size of a serialized scalar of either curve in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Number of hex digits in a zero-padded scalar.
pub const SCALAR_HEX_LEN: usize = SCALAR_SIZE * 2;

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW TAG CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default view tag length in bytes.
/// One byte rejects 255 out of 256 foreign candidates before the pairing.
pub const VIEW_TAG_SIZE: usize = 1;

/// Largest supported view tag length in bytes (a full 256-bit coordinate).
pub const MAX_VIEW_TAG_SIZE: usize = 32;

/// Number of possible 1-byte view tag values (2^8 = 256).
pub const VIEW_TAG_SPACE: usize = 256;

/// Expected filtering efficiency of 1-byte view tags as a percentage.
pub const VIEW_TAG_EFFICIENCY: f64 = 99.609375; // (255/256) * 100

// ═══════════════════════════════════════════════════════════════════════════════
// CURVE NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Name of the spend curve.
pub const SPEND_CURVE_NAME: &str = "secp256k1";

/// Name of the view (pairing) curve.
pub const VIEW_CURVE_NAME: &str = "bn254";

// ═══════════════════════════════════════════════════════════════════════════════
// PERFORMANCE TUNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Default batch size between progress reports while scanning.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 1000;

/// Batches smaller than this are scanned sequentially even in parallel mode.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;
