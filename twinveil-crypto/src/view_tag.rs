//! View tag computation for efficient scanning.
//!
//! View tags let recipients filter payments cheaply:
//! - Each payment carries a short hex view tag
//! - Recipients recompute the tag from the shared view-curve point
//! - Only candidates whose declared tag matches reach the pairing
//!
//! ## Schemes
//!
//! | Name             | Tag                                                   |
//! |------------------|-------------------------------------------------------|
//! | `v1-<N>byte(s)`  | first 2N chars of the minimal lowercase hex of x      |
//! | `v0-<N>byte(s)`  | first 2N chars of hex SHA-256(x_be32 ‖ y_be32)        |
//! | `none`           | empty tag, every valid candidate is fully checked     |
//!
//! ## Efficiency
//!
//! v1 tags are read straight off the coordinate, so their prefix is not
//! uniform: x is below a 254-bit modulus and leading zeros are dropped.
//! v0 tags are uniform and reject 255/256 of foreign candidates per byte.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use twinveil_core::constants::{MAX_VIEW_TAG_SIZE, VIEW_TAG_SIZE};
use twinveil_core::error::{Result, TwinveilError};
use twinveil_core::types::ViewTag;

use crate::view::ViewPoint;

/// How a view tag is derived from the shared view-curve point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewTagScheme {
    /// No tag; every candidate proceeds to the pairing.
    Disabled,
    /// Prefix of the shared point's x coordinate in hex.
    XCoordinate {
        /// Tag length in bytes
        len: usize,
    },
    /// Prefix of SHA-256 over both coordinates.
    Sha256 {
        /// Tag length in bytes
        len: usize,
    },
}

impl Default for ViewTagScheme {
    fn default() -> Self {
        ViewTagScheme::XCoordinate { len: VIEW_TAG_SIZE }
    }
}

impl ViewTagScheme {
    /// Number of hex characters a tag of this scheme carries.
    pub fn hex_len(&self) -> usize {
        match self {
            ViewTagScheme::Disabled => 0,
            ViewTagScheme::XCoordinate { len } | ViewTagScheme::Sha256 { len } => len * 2,
        }
    }

    /// Returns true unless tags are disabled.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ViewTagScheme::Disabled)
    }

    /// Computes the tag for a shared point.
    pub fn compute(&self, shared: &ViewPoint) -> ViewTag {
        let hex = match self {
            ViewTagScheme::Disabled => return ViewTag::default(),
            ViewTagScheme::XCoordinate { .. } => shared.x_integer().to_str_radix(16),
            ViewTagScheme::Sha256 { .. } => {
                let (x, y) = shared.coordinate_bytes();
                let mut hasher = Sha256::new();
                hasher.update(x);
                hasher.update(y);
                hex::encode(hasher.finalize())
            }
        };

        // The minimal x encoding may be shorter than the requested length.
        let take = self.hex_len().min(hex.len());
        ViewTag::new(&hex[..take])
    }

    /// Checks a declared tag against the one computed for `shared`.
    ///
    /// Constant-time over the compared prefix; see [`ViewTag::matches_declared`].
    pub fn verify(&self, shared: &ViewPoint, declared: &ViewTag) -> bool {
        self.compute(shared).matches_declared(declared)
    }

    fn with_len(version: &str, len: usize) -> Result<Self> {
        if len == 0 || len > MAX_VIEW_TAG_SIZE {
            return Err(TwinveilError::ConfigError(format!(
                "view tag length must be 1..={} bytes, got {}",
                MAX_VIEW_TAG_SIZE, len
            )));
        }
        match version {
            "v1" => Ok(ViewTagScheme::XCoordinate { len }),
            "v0" => Ok(ViewTagScheme::Sha256 { len }),
            other => Err(TwinveilError::ConfigError(format!(
                "unknown view tag version '{}'",
                other
            ))),
        }
    }
}

impl FromStr for ViewTagScheme {
    type Err = TwinveilError;

    /// Parses `none`, `v1-<N>byte(s)` or `v0-<N>byte(s)`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        if s == "none" {
            return Ok(ViewTagScheme::Disabled);
        }

        let invalid = || TwinveilError::ConfigError(format!("invalid view tag scheme '{}'", s));
        let (version, size) = s.split_once('-').ok_or_else(invalid)?;
        let digits = size
            .strip_suffix("bytes")
            .or_else(|| size.strip_suffix("byte"))
            .ok_or_else(invalid)?;
        let len = digits.parse::<usize>().map_err(|_| invalid())?;
        Self::with_len(version, len)
    }
}

impl fmt::Display for ViewTagScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (version, len) = match self {
            ViewTagScheme::Disabled => return f.write_str("none"),
            ViewTagScheme::XCoordinate { len } => ("v1", len),
            ViewTagScheme::Sha256 { len } => ("v0", len),
        };
        let unit = if *len == 1 { "byte" } else { "bytes" };
        write!(f, "{}-{}{}", version, len, unit)
    }
}
