//! Meta-address type.

use serde::{Deserialize, Serialize};

use super::PackedPoint;
use crate::error::{Result, TwinveilError};
use crate::traits::CurvePoint;

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A Twinveil meta-address, published out-of-band for receiving payments.
///
/// # Structure
/// - `K` (`spending_pk`): k·G on the spend curve
/// - `V` (`viewing_pk`): v·G on the view curve
///
/// Public, long-lived and safe to publish repeatedly.
///
/// # Example
/// ```ignore
/// use twinveil_core::MetaAddress;
///
/// let meta = MetaAddress::new(spending_pk.pack()?, viewing_pk.pack()?);
/// let json = serde_json::to_string(&meta)?; // {"K":"x.y","V":"x.y"}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAddress {
    /// Spending public key on the spend curve
    #[serde(rename = "K")]
    pub spending_pk: PackedPoint,
    /// Viewing public key on the view curve
    #[serde(rename = "V")]
    pub viewing_pk: PackedPoint,
}

impl MetaAddress {
    /// Creates a meta-address from packed points.
    pub fn new(spending_pk: PackedPoint, viewing_pk: PackedPoint) -> Self {
        Self {
            spending_pk,
            viewing_pk,
        }
    }

    /// Unpacks both keys onto their curves.
    ///
    /// # Errors
    /// Returns [`TwinveilError::InvalidMetaAddress`] naming the offending key.
    pub fn unpack<S: CurvePoint, V: CurvePoint>(&self) -> Result<(S, V)> {
        let spending = S::unpack(&self.spending_pk).map_err(|e| {
            TwinveilError::InvalidMetaAddress(format!("spending key K: {}", e))
        })?;
        let viewing = V::unpack(&self.viewing_pk).map_err(|e| {
            TwinveilError::InvalidMetaAddress(format!("viewing key V: {}", e))
        })?;
        Ok((spending, viewing))
    }

    /// Validates the meta-address against both curves.
    pub fn validate<S: CurvePoint, V: CurvePoint>(&self) -> Result<()> {
        self.unpack::<S, V>().map(|_| ())
    }
}
