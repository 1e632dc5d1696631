//! Operation handlers.
//!
//! Each handler is a pure function from a request DTO to a response DTO.
//! Whole-call inputs fail the entire call; no partial response is produced.

use tracing::{debug, info};

use twinveil_core::codec::is_valid_point;
use twinveil_core::types::{CurveKind, ScanCandidate};
use twinveil_crypto::{SpendPoint, ViewPoint};
use twinveil_scanner::{Scanner, ScannerConfig, ScanSummary};
use twinveil_stealth::payment::SendPayloadBuilder;
use twinveil_stealth::wallet::{recompute_meta_address, ViewingKeyPair};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::ApiConfig;

type Result<T> = std::result::Result<T, ApiError>;

/// Generates fresh secrets and their meta-address.
pub fn generate() -> Result<KeysResponse> {
    let keys = ViewingKeyPair::generate()?;
    let response = keys_response(&keys)?;
    info!("Generated new Twinveil keys");
    Ok(response)
}

/// Recomputes the meta-address for supplied secrets.
pub fn recompute(req: &RecomputeRequest) -> Result<KeysResponse> {
    let keys = ViewingKeyPair::from_hex(&req.k, &req.v)?;
    keys_response(&keys)
}

fn keys_response(keys: &ViewingKeyPair) -> Result<KeysResponse> {
    let meta = recompute_meta_address(keys)?;
    let secrets = keys.export();
    Ok(KeysResponse {
        k: secrets.spending_sk.clone(),
        v: secrets.viewing_sk.clone(),
        spending_pk: meta.spending_pk.into_string(),
        viewing_pk: meta.viewing_pk.into_string(),
    })
}

/// Creates a send payload for the requested meta-address.
pub fn send(config: &ApiConfig, req: &SendRequest) -> Result<SendResponse> {
    let (payload, ephemeral) = SendPayloadBuilder::new()
        .recipient(req.to_meta_address())
        .view_tag_scheme(config.view_tag_scheme)
        .build_with_ephemeral(&mut rand::rngs::OsRng)?;

    debug!(view_tag = %payload.view_tag, "Created send payload");

    Ok(SendResponse {
        r: config.expose_ephemeral.then(|| ephemeral.to_decimal()),
        payload,
    })
}

/// Scans candidates with the supplied secrets.
pub fn scan(config: &ApiConfig, req: &ScanRequest) -> Result<ScanResponse> {
    let keys = ViewingKeyPair::from_hex(&req.k, &req.v)?;
    let candidates = ScanCandidate::zip_parallel(req.rs.clone(), req.view_tags.clone())?;

    let scanner = Scanner::new(
        keys,
        ScannerConfig::new()
            .view_tag_scheme(config.view_tag_scheme)
            .parallel(config.parallel_scan),
    );
    let results = scanner.scan(&candidates);

    let summary = ScanSummary::from(scanner.stats());
    info!(
        total_scanned = summary.total_scanned,
        invalid = summary.invalid,
        discoveries = summary.discoveries,
        duration_ms = summary.duration_ms,
        "Scan request complete"
    );

    let mut response = ScanResponse::default();
    for result in &results {
        response.spending_pks.push(result.spending_pk.as_str().to_owned());
        response.spending_sks.push(result.spending_sk.expose().to_owned());
    }
    Ok(response)
}

/// Checks whether a packed point lies on the requested curve. Never fails.
pub fn validate(req: &ValidateRequest) -> ValidateResponse {
    let valid = match req.curve {
        CurveKind::Spend => is_valid_point::<SpendPoint>(&req.point),
        CurveKind::View => is_valid_point::<ViewPoint>(&req.point),
    };
    ValidateResponse { valid }
}
