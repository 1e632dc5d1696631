//! API error handling.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use twinveil_core::error::TwinveilError;

/// Stable error codes reported at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request cannot be decoded into the expected shape
    MalformedInput,
    /// A point or scalar string fails its lexical constraints
    InvalidEncoding,
    /// Coordinates do not describe a point on the curve
    InvalidPoint,
    /// The target meta-address is invalid
    InvalidMetaAddress,
    /// Random source or pairing failure
    CryptoFailure,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// Returns the wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInput => "MALFORMED_INPUT",
            ErrorCode::InvalidEncoding => "INVALID_ENCODING",
            ErrorCode::InvalidPoint => "INVALID_POINT",
            ErrorCode::InvalidMetaAddress => "INVALID_META_ADDRESS",
            ErrorCode::CryptoFailure => "CRYPTO_FAILURE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API error type.
#[derive(Clone, Debug, Error, Serialize)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Malformed request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedInput, message)
    }

    /// Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Returns the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wraps the error in its response envelope.
    pub fn into_response(self) -> ErrorResponse {
        ErrorResponse { error: self }
    }
}

/// Error response body: `{"error": {"code": .., "message": ..}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// The error
    pub error: ApiError,
}

impl From<TwinveilError> for ApiError {
    fn from(err: TwinveilError) -> Self {
        let code = match &err {
            TwinveilError::MalformedInput(_)
            | TwinveilError::JsonError(_)
            | TwinveilError::ConfigError(_) => ErrorCode::MalformedInput,
            TwinveilError::InvalidEncoding(_) | TwinveilError::HexError(_) => ErrorCode::InvalidEncoding,
            TwinveilError::InvalidPoint { .. } => ErrorCode::InvalidPoint,
            TwinveilError::InvalidMetaAddress(_) => ErrorCode::InvalidMetaAddress,
            TwinveilError::CryptoFailure(_) => ErrorCode::CryptoFailure,
            TwinveilError::IoError(_) | TwinveilError::InternalError(_) => {
                tracing::error!(error = %err, "Internal error");
                return ApiError::internal("An internal error occurred");
            }
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::malformed(format!("Invalid request: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(TwinveilError::MalformedInput("x".into()), "MALFORMED_INPUT")]
    #[test_case(TwinveilError::InvalidEncoding("x".into()), "INVALID_ENCODING")]
    #[test_case(TwinveilError::invalid_point("bn254", "x"), "INVALID_POINT")]
    #[test_case(TwinveilError::InvalidMetaAddress("x".into()), "INVALID_META_ADDRESS")]
    #[test_case(TwinveilError::CryptoFailure("x".into()), "CRYPTO_FAILURE")]
    #[test_case(TwinveilError::InternalError("x".into()), "INTERNAL_ERROR")]
    fn test_error_codes(err: TwinveilError, code: &str) {
        assert_eq!(ApiError::from(err).code().as_str(), code);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "secret path");
        let err = ApiError::from(TwinveilError::from(io));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message().contains("secret path"));
    }

    #[test]
    fn test_config_errors_name_the_variable() {
        let config_err = crate::ApiConfig::from_lookup(|key| {
            (key == crate::ENV_VIEW_TAG_SCHEME).then(|| "v9-1byte".to_string())
        })
        .unwrap_err();
        let err = ApiError::from(config_err);
        assert_eq!(err.code(), ErrorCode::MalformedInput);
        assert!(err.message().contains(crate::ENV_VIEW_TAG_SCHEME));
    }

    #[test]
    fn test_error_response_shape() {
        let body = ApiError::malformed("bad").into_response();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "MALFORMED_INPUT");
        assert_eq!(json["error"]["message"], "bad");
    }
}
