//! # Twinveil API
//!
//! JSON boundary for the Twinveil protocol. Each operation takes one JSON
//! request object and produces one JSON response object, or an error body
//! `{"error": {"code": .., "message": ..}}`.
//!
//! ## Operations
//!
//! - `generate` - Generate new secrets and meta-address
//! - `recompute` - Recompute a meta-address from secrets
//! - `send` - Create a send payload for a meta-address
//! - `scan` - Scan candidates for payments
//! - `validate` - Check a packed point against a curve
//!
//! ## Example
//!
//! ```rust,ignore
//! use twinveil_api::{Api, ApiConfig, Operation};
//!
//! let api = Api::new(ApiConfig::default());
//! let keys = api.handle_json(Operation::Generate, serde_json::json!({}))?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod dto;
pub mod error;
pub mod handlers;
mod state;

pub use error::{ApiError, ErrorCode, ErrorResponse};
pub use state::{ApiConfig, ENV_EXPOSE_EPHEMERAL, ENV_PARALLEL_SCAN, ENV_VIEW_TAG_SCHEME};

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use dto::*;

/// Boundary operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Generate secrets and meta-address
    Generate,
    /// Recompute meta-address from secrets
    Recompute,
    /// Create a send payload
    Send,
    /// Scan candidates
    Scan,
    /// Validate a packed point
    Validate,
}

impl Operation {
    /// All operations, in documentation order.
    pub const ALL: [Operation; 5] = [
        Operation::Generate,
        Operation::Recompute,
        Operation::Send,
        Operation::Scan,
        Operation::Validate,
    ];

    /// Returns the operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Generate => "generate",
            Operation::Recompute => "recompute",
            Operation::Send => "send",
            Operation::Scan => "scan",
            Operation::Validate => "validate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ApiError::malformed(format!("Unknown operation '{}'", s)))
    }
}

/// Operation dispatcher bound to one configuration.
#[derive(Clone, Debug, Default)]
pub struct Api {
    config: ApiConfig,
}

impl Api {
    /// Creates a dispatcher with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Creates a dispatcher configured from the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(ApiConfig::from_env()?))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Generates secrets and meta-address.
    pub fn generate(&self) -> Result<KeysResponse, ApiError> {
        handlers::generate()
    }

    /// Recomputes a meta-address from secrets.
    pub fn recompute(&self, req: &RecomputeRequest) -> Result<KeysResponse, ApiError> {
        handlers::recompute(req)
    }

    /// Creates a send payload.
    pub fn send(&self, req: &SendRequest) -> Result<SendResponse, ApiError> {
        handlers::send(&self.config, req)
    }

    /// Scans candidates.
    pub fn scan(&self, req: &ScanRequest) -> Result<ScanResponse, ApiError> {
        handlers::scan(&self.config, req)
    }

    /// Validates a packed point.
    pub fn validate(&self, req: &ValidateRequest) -> ValidateResponse {
        handlers::validate(req)
    }

    /// Runs an operation on a JSON request and returns the JSON response.
    ///
    /// # Errors
    /// `MALFORMED_INPUT` when the request does not match the operation's shape,
    /// otherwise whatever the operation reports.
    #[instrument(skip(self, request), fields(op = %op))]
    pub fn handle_json(&self, op: Operation, request: Value) -> Result<Value, ApiError> {
        debug!("Dispatching request");
        match op {
            Operation::Generate => to_value(self.generate()?),
            Operation::Recompute => to_value(self.recompute(&from_value(request)?)?),
            Operation::Send => to_value(self.send(&from_value(request)?)?),
            Operation::Scan => to_value(self.scan(&from_value(request)?)?),
            Operation::Validate => to_value(self.validate(&from_value(request)?)),
        }
    }

    /// Like [`Api::handle_json`], but folds errors into the error body.
    pub fn handle_json_or_error(&self, op: Operation, request: Value) -> Value {
        match self.handle_json(op, request) {
            Ok(value) => value,
            Err(err) => serde_json::to_value(err.into_response())
                .unwrap_or_else(|_| serde_json::json!({"error": {"code": "INTERNAL_ERROR"}})),
        }
    }
}

fn from_value<T: DeserializeOwned>(request: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(request)?)
}

fn to_value<T: Serialize>(response: T) -> Result<Value, ApiError> {
    serde_json::to_value(response).map_err(|e| ApiError::internal(e.to_string()))
}
