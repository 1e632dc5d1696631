//! Send payload creation (sender side).

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use twinveil_core::error::{Result, TwinveilError};
use twinveil_core::traits::CurvePoint;
use twinveil_core::types::{MetaAddress, SendPayload};
use twinveil_crypto::{blinding_scalar, SpendPoint, ViewPoint, ViewScalar, ViewTagScheme};

/// The ephemeral scalar `r` behind one payload.
///
/// Only returned on request; zeroized on drop, redacted in `Debug`.
pub struct EphemeralSecret(ViewScalar);

impl EphemeralSecret {
    /// Renders `r` in decimal for transient exposure.
    pub fn to_decimal(&self) -> String {
        self.0.to_decimal()
    }

    /// Returns the scalar.
    pub fn scalar(&self) -> &ViewScalar {
        &self.0
    }
}

impl fmt::Debug for EphemeralSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EphemeralSecret([REDACTED])")
    }
}

/// Creates a payload for `meta_address` with a fresh ephemeral key and the
/// default view tag scheme.
pub fn create_send_payload(meta_address: &MetaAddress) -> Result<SendPayload> {
    SendPayloadBuilder::new()
        .recipient(meta_address.clone())
        .build()
}

/// Like [`create_send_payload`], also returning the ephemeral scalar.
pub fn create_send_payload_with_ephemeral(
    meta_address: &MetaAddress,
    scheme: ViewTagScheme,
) -> Result<(SendPayload, EphemeralSecret)> {
    SendPayloadBuilder::new()
        .recipient(meta_address.clone())
        .view_tag_scheme(scheme)
        .build_with_ephemeral(&mut OsRng)
}

/// Builds the payload for a fixed ephemeral scalar `r`.
///
/// Deterministic: the same inputs always give the same payload.
///
/// # Errors
/// - `InvalidMetaAddress` if K or V is not a valid point on its curve
/// - `CryptoFailure` if the pairing degenerates
pub fn send_payload_from_ephemeral(
    meta_address: &MetaAddress,
    ephemeral: &ViewScalar,
    scheme: ViewTagScheme,
) -> Result<SendPayload> {
    let (spending_pk, viewing_pk) = meta_address.unpack::<SpendPoint, ViewPoint>()?;

    let ephemeral_pk = ViewPoint::mul_base(ephemeral);
    let shared = viewing_pk.mul(ephemeral);

    // Both the tag and b come from the same shared point r·V.
    let view_tag = scheme.compute(&shared);
    let blinding = blinding_scalar(&shared)?;
    let one_time_pk = spending_pk.mul(&blinding);

    Ok(SendPayload {
        ephemeral_key: ephemeral_pk.pack()?,
        view_tag,
        spending_pk: one_time_pk.pack()?,
    })
}

/// Builder for send payloads.
#[derive(Debug, Default)]
pub struct SendPayloadBuilder {
    meta_address: Option<MetaAddress>,
    view_tag_scheme: ViewTagScheme,
}

impl SendPayloadBuilder {
    /// Creates a builder with the default view tag scheme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipient's meta-address.
    pub fn recipient(mut self, meta_address: MetaAddress) -> Self {
        self.meta_address = Some(meta_address);
        self
    }

    /// Sets the view tag scheme.
    pub fn view_tag_scheme(mut self, scheme: ViewTagScheme) -> Self {
        self.view_tag_scheme = scheme;
        self
    }

    /// Builds the payload using the operating system's secure source.
    pub fn build(self) -> Result<SendPayload> {
        self.build_with_rng(&mut OsRng)
    }

    /// Builds the payload drawing `r` from `rng`. `r` is dropped afterwards.
    pub fn build_with_rng<R: RngCore + CryptoRng>(self, rng: &mut R) -> Result<SendPayload> {
        self.build_with_ephemeral(rng).map(|(payload, _)| payload)
    }

    /// Builds the payload and hands back `r`.
    pub fn build_with_ephemeral<R: RngCore + CryptoRng>(
        self,
        rng: &mut R,
    ) -> Result<(SendPayload, EphemeralSecret)> {
        let meta_address = self
            .meta_address
            .ok_or_else(|| TwinveilError::MalformedInput("recipient meta-address is required".into()))?;

        // Reject a bad recipient before drawing randomness.
        meta_address.validate::<SpendPoint, ViewPoint>()?;

        let ephemeral = ViewScalar::random(rng)?;
        let payload = send_payload_from_ephemeral(&meta_address, &ephemeral, self.view_tag_scheme)?;
        debug!(scheme = %self.view_tag_scheme, "created send payload");
        Ok((payload, EphemeralSecret(ephemeral)))
    }
}
